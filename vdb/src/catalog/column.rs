use crate::catalog::ty::Type;

/// A column definition.
///
/// Column names are descriptive only: schema equality and tuple layout
/// are defined by the type sequence alone.
#[derive(Debug, Clone)]
pub struct Column {
    /// The column value type.
    pub ty: Type,
    /// The column identifier, if any.
    pub name: Option<String>,
}

impl Column {
    /// Creates a new named column.
    pub fn new(name: impl Into<String>, ty: Type) -> Column {
        Column {
            ty,
            name: Some(name.into()),
        }
    }

    /// Creates a new anonymous column.
    pub fn anonymous(ty: Type) -> Column {
        Column { ty, name: None }
    }
}
