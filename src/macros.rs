/// Builds an ordered attribute or predicate map.
///
/// Keys are column names; values are anything convertible into
/// [`Value`](crate::Value). Insertion order is preserved, which is the
/// placeholder-binding order for `where` predicates.
///
/// ```
/// use recordlite::attrs;
///
/// let predicates = attrs! { "fname" => "Devon", "house_id" => 3 };
/// assert_eq!(predicates.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Attributes::new();
        $(
            map.insert(::std::string::String::from($column), $crate::Value::from($value));
        )+
        map
    }};
}
