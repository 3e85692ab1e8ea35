mod brave;

pub use brave::BraveSearchProvider;
