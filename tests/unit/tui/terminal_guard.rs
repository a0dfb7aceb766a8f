use super::*;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockOps {
    calls: Mutex<Vec<&'static str>>,
    fail_setup: bool,
}

impl TerminalOps for MockOps {
    fn setup(&self) -> std::io::Result<()> {
        self.calls.lock().unwrap().push("setup");
        if self.fail_setup {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "not a tty"));
        }
        Ok(())
    }

    fn restore(&self) -> std::io::Result<()> {
        self.calls.lock().unwrap().push("restore");
        Ok(())
    }
}

#[test]
fn terminal_guard_restores_on_drop() {
    let ops = Arc::new(MockOps::default());
    {
        let _guard = TerminalGuard::with_ops(ops.clone()).unwrap();
    }

    assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
}

#[test]
fn terminal_restorer_is_idempotent() {
    let ops = Arc::new(MockOps::default());
    let guard = TerminalGuard::with_ops(ops.clone()).unwrap();
    let restorer = guard.restorer();
    assert!(!restorer.is_restored());

    restorer.restore().unwrap();
    restorer.clone().restore().unwrap();
    assert!(restorer.is_restored());
    drop(guard);

    assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
}

#[test]
fn failed_setup_still_restores() {
    let ops = Arc::new(MockOps {
        fail_setup: true,
        ..MockOps::default()
    });

    let err = TerminalGuard::with_ops(ops.clone()).err().unwrap();
    assert_eq!(err.to_string(), "not a tty");
    assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
}

#[test]
fn restore_from_another_thread() {
    let ops = Arc::new(MockOps::default());
    let guard = TerminalGuard::with_ops(ops.clone()).unwrap();
    let restorer = guard.restorer();

    std::thread::spawn(move || restorer.restore().unwrap())
        .join()
        .unwrap();
    drop(guard);

    assert_eq!(&*ops.calls.lock().unwrap(), &["setup", "restore"]);
}

#[test]
fn signal_exit_codes() {
    assert_eq!(TerminationSignal::SigInt.exit_code(), 130);
    assert_eq!(TerminationSignal::SigTerm.exit_code(), 143);
}
