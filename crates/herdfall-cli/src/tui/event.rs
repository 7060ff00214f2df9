use crossterm::event::Event as CrosstermEvent;

/// Events produced by the [`EventLoop`](super::event_loop::EventLoop).
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// The tick interval elapsed.
    Tick,
    /// State changed since the last draw.
    Render,
    /// Key input, mouse, resize and the like.
    Crossterm(CrosstermEvent),
}
