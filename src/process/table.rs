//! OS process table queries backed by `sysinfo`.

use sysinfo::{Pid, ProcessStatus, Signal, System};

fn with_process<T>(pid: u32, f: impl FnOnce(&sysinfo::Process) -> T) -> Option<T> {
    let mut system = System::new();
    let pid = Pid::from_u32(pid);
    if !system.refresh_process(pid) {
        return None;
    }
    system
        .process(pid)
        .filter(|process| process.status() != ProcessStatus::Zombie)
        .map(f)
}

/// Name of the live process `pid`, if there is one
pub fn process_name(pid: u32) -> Option<String> {
    with_process(pid, |process| process.name().to_string())
}

/// True if `pid` is alive and still runs a process called `expected_name`.
///
/// Comparing names guards against the pid having been reused by an
/// unrelated process since it was recorded.
pub fn is_alive(pid: u32, expected_name: &str) -> bool {
    process_name(pid).is_some_and(|name| name == expected_name)
}

/// Ask `pid` to terminate: SIGTERM where supported, otherwise a hard kill
pub fn terminate(pid: u32) -> bool {
    with_process(pid, |process| {
        process
            .kill_with(Signal::Term)
            .unwrap_or_else(|| process.kill())
    })
    .unwrap_or(false)
}
