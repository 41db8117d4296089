//! The live if / menu / choice scope stacks.
//!
//! The three stacks nest independently of each other: an `if` may open
//! inside a menu and close after it. Symbols receive a [`ScopeSnapshot`]
//! copy at declaration time, so later pushes and pops never reach back into
//! already declared symbols.

use crate::symbol::{ChoiceScope, MenuScope, ScopeSnapshot};

/// Scope stacks shared by every file of one parse.
#[derive(Debug, Default)]
pub struct ContextStack {
    ifs: Vec<String>,
    menus: Vec<MenuScope>,
    /// Parallel to `menus`: `true` for scopes opened by `mainmenu`.
    main_menus: Vec<bool>,
    choices: Vec<ChoiceScope>,
}

impl ContextStack {
    /// Empty stacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an `if` scope with condition `cond`.
    pub fn push_if(&mut self, cond: impl Into<String>) {
        self.ifs.push(cond.into());
    }

    /// Pops the innermost `if`; `None` when no `if` is open.
    pub fn pop_if(&mut self) -> Option<String> {
        self.ifs.pop()
    }

    /// Opens a `menu` scope.
    pub fn push_menu(&mut self, menu: MenuScope) {
        self.menus.push(menu);
        self.main_menus.push(false);
    }

    /// Opens a `mainmenu` scope. It shows up in snapshots like any menu but
    /// is not reported by [`unclosed`](Self::unclosed).
    pub fn push_main_menu(&mut self, menu: MenuScope) {
        self.menus.push(menu);
        self.main_menus.push(true);
    }

    /// Pops the innermost menu; `None` when no menu is open.
    pub fn pop_menu(&mut self) -> Option<MenuScope> {
        self.main_menus.pop();
        self.menus.pop()
    }

    /// The innermost open menu.
    pub fn menu_mut(&mut self) -> Option<&mut MenuScope> {
        self.menus.last_mut()
    }

    /// Opens a `choice` scope.
    pub fn push_choice(&mut self, choice: ChoiceScope) {
        self.choices.push(choice);
    }

    /// Pops the innermost choice; `None` when no choice is open.
    pub fn pop_choice(&mut self) -> Option<ChoiceScope> {
        self.choices.pop()
    }

    /// The innermost open choice.
    pub fn choice_mut(&mut self) -> Option<&mut ChoiceScope> {
        self.choices.last_mut()
    }

    /// Copies the current state of all three stacks.
    #[must_use]
    pub fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            if_context: self.ifs.clone(),
            menu_context: self.menus.clone(),
            choice_context: self.choices.clone(),
        }
    }

    /// Scopes still open as `(ifs, menus, choices)`, not counting
    /// `mainmenu` scopes.
    #[must_use]
    pub fn unclosed(&self) -> (usize, usize, usize) {
        let menus = self.main_menus.iter().filter(|&&main| !main).count();
        (self.ifs.len(), menus, self.choices.len())
    }
}
