//! Virtual machine action models.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Object type OnApp records on transactions that act upon a VM.
pub const VIRTUAL_MACHINE_OBJECT_TYPE: &str = "VirtualMachine";

/// State-changing actions available on a virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmAction {
    /// Graceful shutdown through the guest.
    Shutdown,
    /// Forced power off.
    Stop,
    /// Power on.
    Startup,
    /// Release a stuck lock on the VM.
    Unlock,
    /// Reboot.
    Reboot,
    /// Suspend.
    Suspend,
    /// Resume a suspended VM.
    Unsuspend,
}

impl VmAction {
    /// Returns the action name sent as the request `type`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Stop => "stop",
            Self::Startup => "startup",
            Self::Unlock => "unlock",
            Self::Reboot => "reboot",
            Self::Suspend => "suspend",
            Self::Unsuspend => "unsuspend",
        }
    }

    /// Path segment override, if the action is not posted under its name.
    ///
    /// Unsuspend is a POST to the `suspend` toggle.
    #[must_use]
    pub const fn path_override(self) -> Option<&'static str> {
        match self {
            Self::Unsuspend => Some("suspend"),
            Self::Shutdown
            | Self::Stop
            | Self::Startup
            | Self::Unlock
            | Self::Reboot
            | Self::Suspend => None,
        }
    }

    /// Path segment the action is posted to.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self.path_override() {
            Some(path) => path,
            None => self.name(),
        }
    }

    /// Label the server puts on the transaction this action starts.
    #[must_use]
    pub const fn transaction_label(self) -> &'static str {
        match self {
            Self::Shutdown | Self::Stop | Self::Suspend => "stop_virtual_server",
            Self::Startup | Self::Unsuspend => "startup_virtual_server",
            Self::Unlock => "unlock_virtual_server",
            Self::Reboot => "reboot_virtual_server",
        }
    }

    /// Returns all actions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Shutdown,
            Self::Stop,
            Self::Startup,
            Self::Unlock,
            Self::Reboot,
            Self::Suspend,
            Self::Unsuspend,
        ]
    }

    /// Request body for this action.
    #[must_use]
    pub const fn request(self) -> ActionRequest {
        ActionRequest {
            kind: self.name(),
            path: self.path_override(),
        }
    }
}

impl fmt::Display for VmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VmAction {
    type Err = onapp_core::Error;

    fn from_str(s: &str) -> onapp_core::Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.name() == s)
            .ok_or_else(|| onapp_core::Error::invalid_argument("action", format!("unknown action `{s}`")))
    }
}

/// JSON body posted to a VM action endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    /// Action name.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Path segment when it differs from the action name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,
}
