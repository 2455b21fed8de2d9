/// Names the table that stores each model.
///
/// ```ignore
/// table! {
///     Subscriber => "subscribers",
/// }
/// ```
#[macro_export]
macro_rules! table {
    ($($model:ty => $table:literal),+ $(,)?) => {
        $(impl $crate::database::Table for $model {
            fn table() -> &'static str {
                $table
            }
        })+
    };
}
