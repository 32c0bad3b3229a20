use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference, always rendered quoted.
    Identifier(Ident),

    /// A value to bind. Rendered as the next placeholder and pushed to the
    /// parameter list, never inlined.
    Value(Value),

    /// A bare placeholder whose value is supplied at execution time, used
    /// for statements prepared once and executed many times.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub qualifier: Option<String>,
    pub name: String,
}
