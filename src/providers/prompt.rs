/// The prompt sent alongside the image to every vision provider.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax. It asks for a bare JSON array in the same shape
/// [`Recipe`](crate::Recipe) serializes to.
pub const RECIPE_ANALYSIS_PROMPT: &str = include_str!("prompt.txt");
