/// An application driven by the engine's entry point.
///
/// The entry point owns the instance exclusively: it calls [`Application::run`]
/// once and drops the instance right after, so any teardown belongs in `Drop`.
pub trait Application {
    /// Runs the application. Blocks until the application is done.
    fn run(&mut self);
}
