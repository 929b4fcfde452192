//! Linux uinput backend.
//!
//! Opens `/dev/uinput` write-only and non-blocking, and issues each
//! registration request as a raw `ioctl(2)` through `libc`, with the request
//! codes built by `nix`'s `_IO`/`_IOW` macros.  Event records go
//! out through an ordinary `write(2)` on the same file.
//!
//! # Permissions
//!
//! `/dev/uinput` is usually `crw-rw---- root:input` (or root-only).  Run the
//! agent as root, add the user to the `input` group, or install a udev rule
//! such as:
//!
//! ```text
//! KERNEL=="uinput", MODE="0660", GROUP="input", OPTIONS+="static_node=uinput"
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use tracing::info;
use vinput_core::protocol::uinput::UINPUT_SETUP_SIZE;

use super::{RegistrationError, UinputBackend};

// ── uinput request codes (<linux/uinput.h>) ───────────────────────────────────

const UINPUT_IOCTL_BASE: u8 = b'U';

/// `_IO('U', 1)`
const UI_DEV_CREATE: libc::c_ulong =
    nix::request_code_none!(UINPUT_IOCTL_BASE, 1) as libc::c_ulong;
/// `_IO('U', 2)`
const UI_DEV_DESTROY: libc::c_ulong =
    nix::request_code_none!(UINPUT_IOCTL_BASE, 2) as libc::c_ulong;
/// `_IOW('U', 3, struct uinput_setup)`
const UI_DEV_SETUP: libc::c_ulong =
    nix::request_code_write!(UINPUT_IOCTL_BASE, 3, UINPUT_SETUP_SIZE) as libc::c_ulong;
/// `_IOW('U', 100, int)`
const UI_SET_EVBIT: libc::c_ulong =
    nix::request_code_write!(UINPUT_IOCTL_BASE, 100, std::mem::size_of::<libc::c_int>())
        as libc::c_ulong;
/// `_IOW('U', 101, int)`
const UI_SET_KEYBIT: libc::c_ulong =
    nix::request_code_write!(UINPUT_IOCTL_BASE, 101, std::mem::size_of::<libc::c_int>())
        as libc::c_ulong;
/// `_IOW('U', 102, int)`.  103 is `UI_SET_ABSBIT`.
const UI_SET_RELBIT: libc::c_ulong =
    nix::request_code_write!(UINPUT_IOCTL_BASE, 102, std::mem::size_of::<libc::c_int>())
        as libc::c_ulong;

/// An open `/dev/uinput` handle.
///
/// The file descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct UinputFile {
    file: File,
}

impl UinputFile {
    /// Opens the uinput node at `path` (`O_WRONLY | O_NONBLOCK`).
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Open`] if the node is missing or the
    /// process lacks permission.  Not retried.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistrationError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| RegistrationError::Open {
                path: path.display().to_string(),
                source,
            })?;
        info!("opened {}", path.display());
        Ok(Self { file })
    }

    /// `ioctl(fd, request, int)` for the `UI_SET_*BIT` family.
    fn ioctl_int(&self, request: libc::c_ulong, arg: u16) -> io::Result<()> {
        // SAFETY: the fd is owned by `self.file` and open for the lifetime of
        // `self`; UI_SET_*BIT take their argument by value as a C int.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                request as _,
                libc::c_int::from(arg),
            )
        };
        check(ret)
    }

    /// `ioctl(fd, request)` for requests without an argument.
    fn ioctl_none(&self, request: libc::c_ulong) -> io::Result<()> {
        // SAFETY: the fd is valid for the lifetime of `self`; UI_DEV_CREATE
        // and UI_DEV_DESTROY read no argument.
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _) };
        check(ret)
    }
}

fn check(ret: libc::c_int) -> io::Result<()> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

impl UinputBackend for UinputFile {
    fn set_event_bit(&self, event_type: u16) -> io::Result<()> {
        self.ioctl_int(UI_SET_EVBIT, event_type)
    }

    fn set_key_bit(&self, code: u16) -> io::Result<()> {
        self.ioctl_int(UI_SET_KEYBIT, code)
    }

    fn set_rel_bit(&self, axis: u16) -> io::Result<()> {
        self.ioctl_int(UI_SET_RELBIT, axis)
    }

    fn setup(&self, setup: &[u8]) -> io::Result<()> {
        if setup.len() != UINPUT_SETUP_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "uinput_setup must be {UINPUT_SETUP_SIZE} bytes, got {}",
                    setup.len()
                ),
            ));
        }
        // SAFETY: the fd is valid; UI_DEV_SETUP reads exactly
        // UINPUT_SETUP_SIZE bytes from the pointer, and the length was checked
        // above.  The kernel copies the buffer before returning.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                UI_DEV_SETUP as _,
                setup.as_ptr(),
            )
        };
        check(ret)
    }

    fn create(&self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_CREATE)
    }

    fn destroy(&self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_DESTROY)
    }

    fn write(&self, bytes: &[u8]) -> io::Result<usize> {
        // `Write` is implemented for `&File`, so one handle serves every caller.
        (&self.file).write(bytes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_codes_carry_uinput_type_and_number() {
        // The type and number fields sit in the low 16 bits on every architecture.
        let fields = |code: libc::c_ulong| ((code >> 8) & 0xff, code & 0xff);

        assert_eq!(fields(UI_DEV_CREATE), (0x55, 1));
        assert_eq!(fields(UI_DEV_DESTROY), (0x55, 2));
        assert_eq!(fields(UI_DEV_SETUP), (0x55, 3));
        assert_eq!(fields(UI_SET_EVBIT), (0x55, 100));
        assert_eq!(fields(UI_SET_KEYBIT), (0x55, 101));
        assert_eq!(fields(UI_SET_RELBIT), (0x55, 102));
    }

    #[cfg(any(
        target_arch = "x86_64",
        target_arch = "x86",
        target_arch = "aarch64",
        target_arch = "arm"
    ))]
    #[test]
    fn test_request_codes_match_kernel_values() {
        // Values as printed by a C program including <linux/uinput.h>.
        assert_eq!(UI_DEV_CREATE, 0x5501);
        assert_eq!(UI_DEV_DESTROY, 0x5502);
        assert_eq!(UI_DEV_SETUP, 0x405c_5503);
        assert_eq!(UI_SET_EVBIT, 0x4004_5564);
        assert_eq!(UI_SET_KEYBIT, 0x4004_5565);
        // Not 0x4004_5567, which is UI_SET_ABSBIT.
        assert_eq!(UI_SET_RELBIT, 0x4004_5566);
    }

    #[test]
    fn test_open_missing_node_reports_path() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-uinput-here");

        // Act
        let err = UinputFile::open(&missing).unwrap_err();

        // Assert
        match err {
            RegistrationError::Open { path, source } => {
                assert!(path.ends_with("no-uinput-here"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_setup_rejects_wrong_length_before_ioctl() {
        // A regular file stands in for the node; the length check fires first.
        let file = tempfile::NamedTempFile::new().unwrap();
        let backend = UinputFile::open(file.path()).unwrap();

        let err = backend.setup(&[0u8; 10]).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_ioctl_on_regular_file_fails_cleanly() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let backend = UinputFile::open(file.path()).unwrap();

        assert!(backend.create().is_err());
    }

    #[test]
    fn test_write_goes_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let backend = UinputFile::open(file.path()).unwrap();

        let n = backend.write(&[1, 2, 3]).unwrap();

        assert_eq!(n, 3);
        assert_eq!(std::fs::read(file.path()).unwrap(), vec![1, 2, 3]);
    }
}
