#![no_std]

/// One sample written by `hello` into the `output` perf event array.
///
/// The layout mirrors the kernel program's `struct data_t`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct EventRecord {
    pub pid: i32,
    pub uid: i32,
    pub command: [u8; COMMAND_LEN],
    pub message: [u8; MESSAGE_LEN],
    pub path: [u8; PATH_LEN],
}

pub const COMMAND_LEN: usize = 16;
pub const MESSAGE_LEN: usize = 12;
pub const PATH_LEN: usize = 16;

pub const OBJECT_FILE: &str = "hello.bpf.o";

pub const HELLO_PROGRAM: &str = "hello";
pub const OUTPUT_MAP: &str = "output";
pub const MY_CONFIG_MAP: &str = "my_config";
