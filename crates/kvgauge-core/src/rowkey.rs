//! Row key composition.
//!
//! Records from every table share one backend keyspace, so the driver
//! namespaces each record key as `namespace:table:key`. Namespace and table
//! must not contain the separator or terminator characters; the driver
//! configuration enforces this for the namespace at init time.

/// Separator between namespace, table, and record key.
pub const SEPARATOR: char = ':';

/// Terminator for the scan end bound: the character that sorts immediately
/// after [`SEPARATOR`].
pub const TERMINATOR: char = ';';

/// Compose the backend row key for one record.
pub fn row_key(namespace: &str, table: &str, key: &str) -> String {
    let mut row = String::with_capacity(namespace.len() + table.len() + key.len() + 2);
    row.push_str(namespace);
    row.push(SEPARATOR);
    row.push_str(table);
    row.push(SEPARATOR);
    row.push_str(key);
    row
}

/// Exclusive end bound covering every row key of `table`.
///
/// `namespace:table;` sorts after every `namespace:table:<key>` and before
/// the first key of any later table, so a range scan never escapes its
/// table.
pub fn table_end(namespace: &str, table: &str) -> String {
    let mut end = String::with_capacity(namespace.len() + table.len() + 2);
    end.push_str(namespace);
    end.push(SEPARATOR);
    end.push_str(table);
    end.push(TERMINATOR);
    end
}
