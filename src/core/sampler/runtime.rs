use crate::core::sampler::alloc::alloc_stats;
use sysinfo::{Pid, System};
use tracing::debug;

/// Gauges captured on every poll, in the order they are written
pub const SYSTEM_GAUGES: [&str; 11] = [
    "TotalMemory",
    "UsedMemory",
    "FreeMemory",
    "AvailableMemory",
    "TotalSwap",
    "UsedSwap",
    "FreeSwap",
    "CPUutilization",
    "LoadAverage1",
    "LoadAverage5",
    "LoadAverage15",
];

/// Gauges describing the agent process itself, skipped
/// when the process cannot be resolved
pub const PROCESS_GAUGES: [&str; 6] = [
    "ProcessResident",
    "ProcessVirtual",
    "ProcessCPU",
    "ProcessDiskRead",
    "ProcessDiskWritten",
    "ProcessRunTime",
];

/// Allocator gauges, only written when the counting allocator is installed
pub const ALLOC_GAUGES: [&str; 5] = ["Alloc", "TotalAlloc", "Mallocs", "Frees", "HeapObjects"];

/// Reads memory, cpu and process statistics through sysinfo. Keeps the
/// `System` between polls, cpu usage is computed against the previous refresh
pub struct RuntimeStats {
    system: System,
    pid: Option<Pid>,
}

impl RuntimeStats {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                debug!("Process statistics unavailable: {}", e);
                None
            }
        };

        let mut system = System::new();
        system.refresh_cpu();

        RuntimeStats { system, pid }
    }

    /// Refreshes and returns one value per known gauge name
    pub fn collect(&mut self) -> Vec<(&'static str, f64)> {
        self.system.refresh_memory();
        self.system.refresh_cpu();

        let load = System::load_average();

        let mut samples = vec![
            ("TotalMemory", self.system.total_memory() as f64),
            ("UsedMemory", self.system.used_memory() as f64),
            ("FreeMemory", self.system.free_memory() as f64),
            ("AvailableMemory", self.system.available_memory() as f64),
            ("TotalSwap", self.system.total_swap() as f64),
            ("UsedSwap", self.system.used_swap() as f64),
            ("FreeSwap", self.system.free_swap() as f64),
            ("CPUutilization", self.system.global_cpu_info().cpu_usage() as f64),
            ("LoadAverage1", load.one),
            ("LoadAverage5", load.five),
            ("LoadAverage15", load.fifteen),
        ];

        let alloc = alloc_stats();
        if alloc.mallocs > 0 {
            samples.extend([
                ("Alloc", alloc.allocated as f64),
                ("TotalAlloc", alloc.total_allocated as f64),
                ("Mallocs", alloc.mallocs as f64),
                ("Frees", alloc.frees as f64),
                ("HeapObjects", alloc.heap_objects() as f64),
            ]);
        }

        if let Some(pid) = self.pid {
            if self.system.refresh_process(pid) {
                if let Some(process) = self.system.process(pid) {
                    let disk = process.disk_usage();

                    samples.extend([
                        ("ProcessResident", process.memory() as f64),
                        ("ProcessVirtual", process.virtual_memory() as f64),
                        ("ProcessCPU", process.cpu_usage() as f64),
                        ("ProcessDiskRead", disk.total_read_bytes as f64),
                        ("ProcessDiskWritten", disk.total_written_bytes as f64),
                        ("ProcessRunTime", process.run_time() as f64),
                    ]);
                }
            } else {
                debug!("Failed refreshing process {}", pid);
            }
        }

        samples
    }
}

impl Default for RuntimeStats {
    fn default() -> Self {
        Self::new()
    }
}
