//! Process bootstrap: factory, banner, run, destroy.

use std::io::{self, Write};

use tracing::info;

use crate::application::Application;

pub const BANNER: &str = "This is a Native Engine Application";

/// Creates the application through `create_application`, prints the banner to
/// stdout, runs the application and drops it once `run` returns.
pub fn bootstrap<F>(create_application: F)
where
    F: FnOnce() -> Box<dyn Application>,
{
    if let Err(err) = bootstrap_with(create_application, io::stdout()) {
        panic!("failed printing to stdout: {err}");
    }
}

/// Same as [`bootstrap`], writing the banner to `out`.
///
/// `out` is released before `run`, so a locked writer never blocks the
/// application's own output. A failed banner write does not skip any step;
/// the error is returned after the application has been dropped.
pub fn bootstrap_with<F, W>(create_application: F, mut out: W) -> io::Result<()>
where
    F: FnOnce() -> Box<dyn Application>,
    W: Write,
{
    let mut app = create_application();
    let banner = writeln!(out, "{BANNER}").and_then(|()| out.flush());
    drop(out);
    app.run();
    drop(app);
    info!("Application destroyed");
    banner
}

/// Defines `fn main` for an executable built on the engine.
///
/// ```
/// use native_engine::Application;
///
/// struct Sandbox;
///
/// impl Application for Sandbox {
///     fn run(&mut self) {}
/// }
///
/// fn create_application() -> Box<dyn Application> {
///     Box::new(Sandbox)
/// }
///
/// native_engine::entry_point!(create_application);
/// # main();
/// ```
#[macro_export]
macro_rules! entry_point {
    ($create_application:expr) => {
        fn main() {
            $crate::entry_point::bootstrap($create_application);
        }
    };
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        log: Log,
    }

    impl Application for Recorder {
        fn run(&mut self) {
            self.log.borrow_mut().push("run".into());
        }
    }

    impl Drop for Recorder {
        fn drop(&mut self) {
            self.log.borrow_mut().push("drop".into());
        }
    }

    /// Writer that records the banner into the shared log.
    struct LogWriter {
        log: Log,
    }

    impl Write for LogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let text = String::from_utf8_lossy(buf).trim_end().to_string();
            if !text.is_empty() {
                self.log.borrow_mut().push(format!("print:{text}"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn factory(log: Log) -> impl FnOnce() -> Box<dyn Application> {
        move || -> Box<dyn Application> {
            log.borrow_mut().push("create".into());
            Box::new(Recorder { log })
        }
    }

    #[test]
    fn runs_steps_once_in_order() {
        let log: Log = Rc::default();
        let mut out = LogWriter { log: log.clone() };

        bootstrap_with(factory(log.clone()), &mut out).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "create".to_string(),
                format!("print:{BANNER}"),
                "run".to_string(),
                "drop".to_string(),
            ]
        );
    }

    #[test]
    fn banner_is_a_single_line() {
        let log: Log = Rc::default();
        let mut out = Vec::new();

        bootstrap_with(factory(log.clone()), &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{BANNER}\n"));
        assert_eq!(*log.borrow(), vec!["create", "run", "drop"]);
    }

    #[test]
    fn failed_banner_still_runs_and_drops() {
        let log: Log = Rc::default();

        let err = bootstrap_with(factory(log.clone()), BrokenPipe).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(*log.borrow(), vec!["create", "run", "drop"]);
    }

    #[test]
    fn stdout_is_free_while_running() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        struct PrintsFromWorker {
            printed: Rc<RefCell<bool>>,
        }

        impl Application for PrintsFromWorker {
            fn run(&mut self) {
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    println!("worker output");
                    let _ = tx.send(());
                });
                *self.printed.borrow_mut() = rx.recv_timeout(Duration::from_secs(2)).is_ok();
            }
        }

        let printed = Rc::new(RefCell::new(false));
        let app_printed = printed.clone();
        bootstrap(move || -> Box<dyn Application> {
            Box::new(PrintsFromWorker {
                printed: app_printed,
            })
        });

        assert!(*printed.borrow(), "worker could not print during run");
    }

    static MACRO_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Application for Counted {
        fn run(&mut self) {
            MACRO_RUNS.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn create_counted() -> Box<dyn Application> {
        Box::new(Counted)
    }

    mod generated {
        crate::entry_point!(super::create_counted);

        pub fn call_main() {
            main();
        }
    }

    #[test]
    fn entry_point_macro_defines_a_bootstrapping_main() {
        generated::call_main();
        assert_eq!(MACRO_RUNS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn accepts_plain_function_factories() {
        struct Noop;
        impl Application for Noop {
            fn run(&mut self) {}
        }
        fn create_application() -> Box<dyn Application> {
            Box::new(Noop)
        }

        let mut out = Vec::new();
        bootstrap_with(create_application, &mut out).unwrap();
        assert!(!out.is_empty());
    }
}
