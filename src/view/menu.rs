use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    DisplayOrders,
    AddOrder,
    EditOrder,
    RemoveOrder,
    ExportAll,
    Exit,
}

impl MenuSelection {
    /// Menu order, numbered from 1.
    pub const ALL: [MenuSelection; 6] = [
        MenuSelection::DisplayOrders,
        MenuSelection::AddOrder,
        MenuSelection::EditOrder,
        MenuSelection::RemoveOrder,
        MenuSelection::ExportAll,
        MenuSelection::Exit,
    ];

    pub fn from_choice(choice: u32) -> Option<MenuSelection> {
        let idx = usize::try_from(choice).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    pub fn nice_name(&self) -> &'static str {
        match self {
            MenuSelection::DisplayOrders => "Display Orders",
            MenuSelection::AddOrder => "Add an Order",
            MenuSelection::EditOrder => "Edit an Order",
            MenuSelection::RemoveOrder => "Remove an Order",
            MenuSelection::ExportAll => "Export All Data",
            MenuSelection::Exit => "Quit",
        }
    }
}

impl fmt::Display for MenuSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nice_name())
    }
}
