#![forbid(unsafe_code)]

//! Raw-mode, alternate-screen terminal guard.
//!
//! Everything enabled in [`TerminalGuard::enter`] is undone on drop, and a
//! panic hook restores the terminal before the panic message prints.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{cursor, execute, terminal};

static ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, with the cursor hidden.
    ///
    /// # Errors
    ///
    /// Fails if another guard is live or the terminal refuses raw mode.
    pub fn enter() -> io::Result<Self> {
        if ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(io::Error::other("terminal already in use"));
        }
        install_panic_hook();

        if let Err(e) = terminal::enable_raw_mode() {
            ACTIVE.store(false, Ordering::SeqCst);
            return Err(e);
        }
        // Set before entering so a partial failure still leaves on drop.
        let guard = Self {
            alternate_screen: true,
        };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;
        tracing::debug!("terminal entered");
        Ok(guard)
    }

    /// Current size in cells.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        ACTIVE.store(false, Ordering::SeqCst);
        tracing::debug!("terminal restored");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if ACTIVE.load(Ordering::SeqCst) {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
                let _ = terminal::disable_raw_mode();
                let _ = stdout.flush();
            }
            previous(info);
        }));
    });
}
