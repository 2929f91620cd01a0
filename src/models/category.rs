use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of spending categories budgets are planned against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Rent,
    Food,
    Bills,
    Healthcare,
    Transport,
    Education,
    Shopping,
    Entertainment,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Rent => "Rent",
            Category::Food => "Food",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Transport => "Transport",
            Category::Education => "Education",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        };
        write!(f, "{}", name)
    }
}
