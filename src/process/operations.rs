use std::path::Path;
use std::time::Duration;
use sysinfo::{
    Pid as SysinfoPid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, Signal, System,
    UpdateKind,
};
use tracing::{debug, info, warn};

use crate::process::errors::ProcessError;
use crate::process::types::{ProcessInfo, TerminationOutcome};

/// Fixed wait between the graceful and the forceful signal.
pub const GRACE_PERIOD: Duration = Duration::from_secs(10);
/// Short wait after the forceful signal before the final liveness check.
pub const SETTLE_PERIOD: Duration = Duration::from_secs(1);

/// Find all processes whose working directory is inside `directory`.
///
/// The calling process itself is excluded. Discovery failures degrade to an
/// empty result rather than aborting the run.
pub fn find_processes_in_directory(directory: &Path) -> Vec<ProcessInfo> {
    let directory = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing()
            .with_cwd(UpdateKind::Always)
            .with_cmd(UpdateKind::Always),
    );

    let own_pid = std::process::id();
    let mut processes = Vec::new();

    for (pid, process) in system.processes() {
        if pid.as_u32() == own_pid {
            continue;
        }

        let Some(cwd) = process.cwd() else {
            continue;
        };

        if !cwd.starts_with(&directory) {
            continue;
        }

        let command = process
            .cmd()
            .iter()
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        let command = if command.is_empty() {
            process.name().to_string_lossy().to_string()
        } else {
            command
        };

        processes.push(ProcessInfo {
            pid: pid.as_u32(),
            command,
            working_dir: cwd.to_path_buf(),
        });
    }

    debug!(
        event = "process.discovery_completed",
        directory = %directory.display(),
        count = processes.len()
    );

    processes
}

/// Check if a process with the given PID is currently running.
/// Zombies no longer hold any files open and count as not running.
pub fn is_process_running(pid: u32) -> bool {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    match system.process(pid_obj) {
        Some(process) => !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead),
        None => false,
    }
}

/// Terminate processes with the standard grace and settle periods.
pub fn terminate_processes(processes: &[ProcessInfo]) -> TerminationOutcome {
    terminate_with_grace(processes, GRACE_PERIOD, SETTLE_PERIOD)
}

/// Two-phase termination: interrupt every process, wait out the grace
/// period, forcefully kill whatever is still alive, then re-check once more
/// after a short settle period.
///
/// Survivors of the forceful phase are always a subset of the survivors of
/// the graceful phase.
pub fn terminate_with_grace(
    processes: &[ProcessInfo],
    grace: Duration,
    settle: Duration,
) -> TerminationOutcome {
    if processes.is_empty() {
        debug!(event = "process.terminate_noop");
        return TerminationOutcome::default();
    }

    info!(event = "process.terminate_started", count = processes.len());

    let mut interrupted = 0;
    for process in processes {
        match send_signal(process.pid, Signal::Interrupt) {
            Ok(()) => {
                debug!(
                    event = "process.interrupt_sent",
                    pid = process.pid,
                    command = process.command
                );
                interrupted += 1;
            }
            Err(e) => {
                warn!(
                    event = "process.interrupt_failed",
                    pid = process.pid,
                    error = %e
                );
            }
        }
    }

    debug!(event = "process.grace_wait", seconds = grace.as_secs_f64());
    std::thread::sleep(grace);

    let graceful_survivors: Vec<&ProcessInfo> = processes
        .iter()
        .filter(|p| is_process_running(p.pid))
        .collect();

    let mut forced = 0;
    if !graceful_survivors.is_empty() {
        info!(
            event = "process.force_kill_started",
            count = graceful_survivors.len()
        );
        for process in &graceful_survivors {
            match send_signal(process.pid, Signal::Kill) {
                Ok(()) => {
                    debug!(
                        event = "process.kill_sent",
                        pid = process.pid,
                        command = process.command
                    );
                    forced += 1;
                }
                Err(e) => {
                    warn!(
                        event = "process.kill_failed",
                        pid = process.pid,
                        error = %e
                    );
                }
            }
        }
        std::thread::sleep(settle);
    }

    // Only the graceful-phase survivors can still be alive here, which keeps
    // the survivor set monotonically shrinking across phases.
    let survivors: Vec<ProcessInfo> = graceful_survivors
        .into_iter()
        .filter(|p| is_process_running(p.pid))
        .cloned()
        .collect();

    if survivors.is_empty() {
        info!(event = "process.terminate_completed", count = processes.len());
    } else {
        warn!(
            event = "process.terminate_incomplete",
            survivors = survivors.len()
        );
        for process in &survivors {
            warn!(
                event = "process.survivor",
                pid = process.pid,
                command = process.command
            );
        }
    }

    TerminationOutcome {
        interrupted,
        forced,
        survivors,
    }
}

fn send_signal(pid: u32, signal: Signal) -> Result<(), ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => match process.kill_with(signal) {
            Some(true) => Ok(()),
            Some(false) => Err(ProcessError::SignalFailed {
                pid,
                message: format!("{:?} delivery failed", signal),
            }),
            None => Err(ProcessError::SignalFailed {
                pid,
                message: format!("{:?} not supported on this platform", signal),
            }),
        },
        None => Err(ProcessError::NotFound { pid }),
    }
}
