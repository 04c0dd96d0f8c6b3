/// Where a click landed relative to the mobile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    MenuToggle,
    NavLink,
    /// Inside the nav but not on a link.
    Nav,
    Elsewhere,
}

/// Mobile navigation drawer. The toggle button and the drawer share one
/// `active` state.
#[derive(Debug, Default, Clone)]
pub struct MobileNav {
    open: bool,
}

impl MobileNav {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::MenuToggle => self.open = !self.open,
            ClickTarget::NavLink | ClickTarget::Elsewhere => self.open = false,
            ClickTarget::Nav => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_then_link_closes() {
        let mut nav = MobileNav::default();
        nav.click(ClickTarget::MenuToggle);
        assert!(nav.is_open());
        nav.click(ClickTarget::Nav);
        assert!(nav.is_open());
        nav.click(ClickTarget::NavLink);
        assert!(!nav.is_open());
    }

    #[test]
    fn outside_click_closes() {
        let mut nav = MobileNav::default();
        nav.click(ClickTarget::MenuToggle);
        nav.click(ClickTarget::Elsewhere);
        assert!(!nav.is_open());
        nav.click(ClickTarget::MenuToggle);
        nav.click(ClickTarget::MenuToggle);
        assert!(!nav.is_open());
    }
}
