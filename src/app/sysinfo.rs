use std::env;
use sysinfo::System;

/// Host facts for the optional summary section.
///
/// Only stable values belong here: the section must not change between two
/// runs on an unchanged tree, so usage figures and anything else that moves
/// are deliberately left out.
pub fn system_summary() -> String {
    let mut sys = System::new();
    sys.refresh_cpu_specifics(sysinfo::CpuRefreshKind::everything());
    sys.refresh_memory();

    let unknown = || "unknown".to_string();
    let os_name = System::name().unwrap_or_else(unknown);
    let os_version = System::os_version().unwrap_or_else(unknown);
    let kernel = System::kernel_version().unwrap_or_else(unknown);
    let host = System::host_name().unwrap_or_else(unknown);

    let mut out = String::new();
    out.push_str(&format!("Operating system: {} {}\n", os_name, os_version));
    out.push_str(&format!("Kernel version: {}\n", kernel));
    out.push_str(&format!("Architecture: {}\n", env::consts::ARCH));
    out.push_str(&format!("Hostname: {}\n", host));
    if let Some(cpu) = sys.cpus().first() {
        out.push_str(&format!(
            "Cpu: {} ({} cores)\n",
            cpu.brand().trim(),
            sys.cpus().len()
        ));
    }
    out.push_str(&format!(
        "Memory: {} MiB\n",
        sys.total_memory() / (1024 * 1024)
    ));
    out
}
