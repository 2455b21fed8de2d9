/// Moves every `Some` field of a destructured patch onto `$target`.
///
/// ```ignore
/// let UserPatch { name, email, .. } = patch;
/// merge!(user; name, email);
/// ```
macro_rules! merge {
    ($target:expr; $($field:ident),* $(,)?) => {
        $(if let Some(value) = $field {
            $target.$field = value;
        })*
    };
}
