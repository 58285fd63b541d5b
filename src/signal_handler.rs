//! Fatal signal translation
//!
//! Installs process-wide handlers that turn fatal OS signals into one
//! uniform, human-readable diagnostic before the process terminates, so an
//! unattended batch run never dies silently. A delivered signal is never
//! recoverable: the handler reports and exits.

use std::sync::Once;

use libc::c_int;

/// Fixed marker prefixing every translated diagnostic.
pub const SYSTEM_MARKER: &str = "[SYSTEM]";

/// Pre-formats one diagnostic line at compile time; every registered
/// message goes through this so the marker cannot drift from
/// [`SYSTEM_MARKER`] (asserted in the tests below).
macro_rules! diagnostic {
    ($msg:literal) => {
        concat!("[SYSTEM] ", $msg)
    };
}

#[cfg(target_os = "linux")]
const FATAL_SIGNALS: &[c_int] = &[
    libc::SIGHUP,
    libc::SIGINT,
    libc::SIGQUIT,
    libc::SIGILL,
    libc::SIGBUS,
    libc::SIGFPE,
    libc::SIGSEGV,
    libc::SIGALRM,
    libc::SIGTERM,
    libc::SIGPWR,
    libc::SIGSYS,
];

#[cfg(not(target_os = "linux"))]
const FATAL_SIGNALS: &[c_int] = &[
    libc::SIGHUP,
    libc::SIGINT,
    libc::SIGQUIT,
    libc::SIGILL,
    libc::SIGBUS,
    libc::SIGFPE,
    libc::SIGSEGV,
    libc::SIGALRM,
    libc::SIGTERM,
    libc::SIGSYS,
];

/// Pre-formatted diagnostic for a registered fatal signal, or `None` for
/// codes the translator never handles.
pub fn description(code: c_int) -> Option<&'static str> {
    Some(match code {
        libc::SIGHUP => diagnostic!("(SIGHUP) Disconnection of terminal"),
        libc::SIGINT => diagnostic!("(SIGINT) Program manually interrupted"),
        libc::SIGQUIT => diagnostic!("(SIGQUIT) Process terminated (generating core dump)"),
        libc::SIGILL => diagnostic!("(SIGILL) Illegal instruction (corrupt binary command file?)"),
        libc::SIGBUS => diagnostic!("(SIGBUS) Bus error: Accessing invalid address (out of storage space?)"),
        libc::SIGFPE => diagnostic!("(SIGFPE) Floating-point arithmetic exception"),
        libc::SIGSEGV => diagnostic!("(SIGSEGV) Segmentation fault"),
        libc::SIGALRM => diagnostic!("(SIGALRM) Timer expiration"),
        libc::SIGTERM => diagnostic!("(SIGTERM) Terminated by kill command"),
        #[cfg(target_os = "linux")]
        libc::SIGPWR => diagnostic!("(SIGPWR) Power failure restart"),
        libc::SIGSYS => diagnostic!("(SIGSYS) Bad system call"),
        _ => return None,
    })
}

/// The signal handler itself. Restricted to async-signal-safe work: one
/// pre-formatted write to stderr, then immediate termination. No
/// allocation, no unwinding, no return to the faulting code.
extern "C" fn handle_fatal(code: c_int) {
    if let Some(message) = description(code) {
        // SAFETY: write(2) and _exit(2) are async-signal-safe; the message
        // bytes are 'static and were formatted before installation.
        unsafe {
            libc::write(
                libc::STDERR_FILENO,
                message.as_ptr() as *const libc::c_void,
                message.len(),
            );
            libc::write(libc::STDERR_FILENO, b"\n".as_ptr() as *const libc::c_void, 1);
        }
    }
    // Conventional exit status for death by signal `code`.
    unsafe { libc::_exit(128 + code) }
}

static INSTALL: Once = Once::new();

/// Arm one handler per registered fatal signal, exactly once per process.
///
/// While a handler runs, SIGINT and SIGQUIT are blocked, so a second fatal
/// signal cannot interleave with the report of the first. Later calls are
/// no-ops.
pub fn install() {
    INSTALL.call_once(|| {
        for &code in FATAL_SIGNALS {
            // SAFETY: sigaction with a handler that only performs
            // async-signal-safe calls; the action struct is fully
            // initialized before registration.
            unsafe {
                let mut action: libc::sigaction = std::mem::zeroed();
                action.sa_sigaction = handle_fatal as libc::sighandler_t;
                libc::sigemptyset(&mut action.sa_mask);
                libc::sigaddset(&mut action.sa_mask, libc::SIGINT);
                libc::sigaddset(&mut action.sa_mask, libc::SIGQUIT);
                action.sa_flags = 0;
                libc::sigaction(code, &action, std::ptr::null_mut());
            }
        }
        log::info!("Fatal signal handlers installed for {} signals", FATAL_SIGNALS.len());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_signal_has_a_description() {
        for &code in FATAL_SIGNALS {
            let message = description(code)
                .unwrap_or_else(|| panic!("Missing description for signal {}", code));
            assert!(message.starts_with(&format!("{} ", SYSTEM_MARKER)));
        }
    }

    #[test]
    fn test_unregistered_signal_has_no_description() {
        assert_eq!(description(libc::SIGCHLD), None);
        assert_eq!(description(0), None);
    }

    #[test]
    fn test_diagnostic_wording() {
        let segv = description(libc::SIGSEGV).expect("SIGSEGV must be registered");
        assert_eq!(segv, "[SYSTEM] (SIGSEGV) Segmentation fault");

        let bus = description(libc::SIGBUS).expect("SIGBUS must be registered");
        assert_eq!(
            bus,
            "[SYSTEM] (SIGBUS) Bus error: Accessing invalid address (out of storage space?)"
        );
    }

    #[test]
    fn test_install_is_idempotent() {
        install();
        install();
    }
}
