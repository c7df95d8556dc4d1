use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use hello_tracer_common::{HELLO_PROGRAM, MY_CONFIG_MAP, OBJECT_FILE, OUTPUT_MAP};

pub const DEFAULT_OBJECT_DIR: &str = "./build/ebpf";

/// kprobe on the architecture's wrapper for a syscall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    syscall: String,
}

impl Hook {
    pub fn syscall(name: &str) -> Self {
        Self {
            syscall: name.to_owned(),
        }
    }

    /// Kernel symbol the kprobe is placed on, e.g. `__x64_sys_execve`.
    pub fn kprobe_target(&self) -> String {
        format!("{}{}", syscall_prefix(), self.syscall)
    }
}

fn syscall_prefix() -> &'static str {
    if cfg!(target_arch = "x86_64") {
        "__x64_sys_"
    } else if cfg!(target_arch = "aarch64") {
        "__arm64_sys_"
    } else if cfg!(target_arch = "riscv64") {
        "__riscv_sys_"
    } else if cfg!(target_arch = "s390x") {
        "__s390x_sys_"
    } else {
        "sys_"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointSpec {
    pub name: String,
    pub hook: Hook,
}

/// Compiled-in description of what the tracer needs from the object.
#[derive(Debug, Clone)]
pub struct TracerConfig {
    pub entry_points: Vec<EntryPointSpec>,
    pub maps: Vec<String>,
    /// Map feeding the event poller. Must also appear in `maps`.
    pub event_map: String,
    pub poll_timeout: Duration,
    pub pages_per_cpu: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            entry_points: vec![EntryPointSpec {
                name: HELLO_PROGRAM.to_owned(),
                hook: Hook::syscall("execve"),
            }],
            // my_config is resolved but not read by the tracer yet.
            maps: vec![OUTPUT_MAP.to_owned(), MY_CONFIG_MAP.to_owned()],
            event_map: OUTPUT_MAP.to_owned(),
            poll_timeout: Duration::from_millis(1000),
            pages_per_cpu: 8,
        }
    }
}

pub fn object_path(dir: &Path) -> PathBuf {
    dir.join(OBJECT_FILE)
}
