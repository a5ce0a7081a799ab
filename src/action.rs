#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    /// Ask for confirmation before killing.
    Kill(u32),
    ConfirmKill,
    CancelKill,
    Refresh,
    None,
}
