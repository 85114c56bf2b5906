//! Macros for building style maps.

/// Builds a [`StyleMap`](crate::StyleMap) from `key => value` pairs.
///
/// Values go through `Into<StyleValue>`, so numbers, strings, tuples, vectors and
/// nested `style!` maps can be mixed freely. Insertion order is kept.
///
/// # Example
///
/// ```rust
/// use vss::{StyleValue, style};
///
/// let style = style! {
///     "bg" => "#ffffff",
///     "padding" => (12, 6),
///     "hover" => style! { "bg" => "#eeeeee" },
/// };
///
/// assert_eq!(style.len(), 3);
/// assert_eq!(style.get("bg"), Some(&StyleValue::from("#ffffff")));
/// ```
#[macro_export]
macro_rules! style {
    () => {
        $crate::StyleMap::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::StyleMap::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
