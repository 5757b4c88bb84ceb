use nalgebra::Point3;

/// An atom of a conformer.
///
/// Atoms are immutable once constructed. The element symbol is stored in canonical
/// capitalisation (`"CL"` and `"cl"` both become `"Cl"`) so that lookups into
/// element tables are insensitive to how the upstream parser spelled it.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "Cl").
    pub element: String,
    /// The position in the length unit of the owning conformer.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: canonical_symbol(element),
            position,
        }
    }
}

/// Normalizes an element symbol to an uppercase first letter followed by lowercase.
pub fn canonical_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
