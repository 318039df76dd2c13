use std::fmt;

/// Logical pages reachable through navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Login, Route::Bills, Route::NewBill];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Bills => "#employee/bills",
            Self::NewBill => "#employee/bill/new",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn requires_employee(&self) -> bool {
        matches!(self, Self::Bills | Self::NewBill)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
