// Dashboard page rendering

use std::fmt::{self, Write};

use crate::models::SystemSnapshot;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;background:#f6f7f9;color:#222}\
section{background:#fff;border-radius:6px;padding:1rem 1.5rem;margin-bottom:1rem}\
table{border-collapse:collapse}td,th{padding:.25rem .75rem;text-align:left}\
th{border-bottom:1px solid #ddd}.muted{color:#888}";

pub(super) fn render_index(snapshot: &SystemSnapshot) -> String {
    let mut out = String::with_capacity(8 * 1024);
    // fmt::Write into a String cannot fail.
    let _ = write_page(&mut out, snapshot);
    out
}

fn write_page(out: &mut String, s: &SystemSnapshot) -> fmt::Result {
    let id = &s.system.identity;
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <meta http-equiv=\"refresh\" content=\"5\">\
         <title>{} - hostdash</title><style>{STYLE}</style></head><body>",
        escape(&id.hostname)
    )?;

    out.push_str("<section><h2>System</h2><table>");
    row(out, "Hostname", &id.hostname)?;
    row(out, "IP address", &id.ip)?;
    row(out, "OS", &format!("{} {}", id.os, id.os_version))?;
    row(out, "Kernel", &id.kernel_version)?;
    row(out, "Architecture", &id.architecture)?;
    row(out, "Processor", &id.processor)?;
    row(out, "Uptime", &s.system.uptime)?;
    out.push_str("</table></section>");

    out.push_str("<section><h2>CPU</h2>");
    match &s.cpu {
        Some(cpu) => {
            out.push_str("<table>");
            let cores = cpu
                .physical_cores
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".into());
            row(out, "Cores / threads", &format!("{cores} / {}", cpu.logical_threads))?;
            row(out, "Usage", &format!("{:.1}%", cpu.usage_percent))?;
            if let Some(mhz) = cpu.frequency_mhz {
                let max = cpu
                    .max_frequency_mhz
                    .map(|m| format!(" (max {m} MHz)"))
                    .unwrap_or_default();
                row(out, "Frequency", &format!("{mhz} MHz{max}"))?;
            }
            let per_core = cpu
                .per_core_percent
                .iter()
                .map(|p| format!("{p:.0}%"))
                .collect::<Vec<_>>()
                .join(" ");
            row(out, "Per core", &per_core)?;
            out.push_str("</table>");
        }
        None => unavailable(out),
    }
    out.push_str("</section>");

    out.push_str("<section><h2>Memory</h2>");
    match &s.memory {
        Some(mem) => {
            out.push_str("<table>");
            row(
                out,
                "RAM",
                &format!(
                    "{:.2} / {:.2} GB ({:.1}%)",
                    mem.used_gb, mem.total_gb, mem.percent
                ),
            )?;
            row(out, "Available", &format!("{:.2} GB", mem.available_gb))?;
            row(
                out,
                "Swap",
                &format!(
                    "{:.2} / {:.2} GB ({:.1}%)",
                    mem.swap_used_gb, mem.swap_total_gb, mem.swap_percent
                ),
            )?;
            out.push_str("</table>");
        }
        None => unavailable(out),
    }
    out.push_str("</section>");

    out.push_str("<section><h2>Disks</h2>");
    if s.disks.is_empty() {
        unavailable(out);
    } else {
        out.push_str(
            "<table><tr><th>Device</th><th>Mount</th><th>Type</th>\
             <th>Total</th><th>Used</th><th>Free</th><th>Use</th></tr>",
        );
        for d in &s.disks {
            write!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2} GB</td><td>{:.2} GB</td>\
                 <td>{:.2} GB</td><td>{:.1}%</td></tr>",
                escape(&d.device),
                escape(&d.mountpoint),
                escape(&d.fs_type),
                d.total_gb,
                d.used_gb,
                d.free_gb,
                d.percent
            )?;
        }
        out.push_str("</table>");
    }
    out.push_str("</section>");

    out.push_str("<section><h2>I/O</h2><table>");
    match &s.disk_io {
        Some(io) => row(
            out,
            "Disk read / written",
            &format!("{:.2} GB / {:.2} GB", io.read_gb, io.write_gb),
        )?,
        None => row(out, "Disk read / written", "unavailable")?,
    }
    match &s.network {
        Some(net) => row(
            out,
            "Network sent / received",
            &format!("{:.2} MB / {:.2} MB", net.sent_mb, net.recv_mb),
        )?,
        None => row(out, "Network sent / received", "unavailable")?,
    }
    out.push_str("</table></section>");

    out.push_str("<section><h2>Battery</h2>");
    match &s.battery {
        Some(bat) => {
            out.push_str("<table>");
            row(out, "Charge", &format!("{:.0}%", bat.percent))?;
            row(out, "Plugged in", if bat.plugged { "yes" } else { "no" })?;
            row(out, "Time left", &bat.time_left)?;
            out.push_str("</table>");
        }
        None => out.push_str("<p class=\"muted\">No battery detected</p>"),
    }
    out.push_str("</section>");

    out.push_str("<section><h2>Top processes</h2>");
    if s.processes.is_empty() {
        unavailable(out);
    } else {
        out.push_str("<table><tr><th>PID</th><th>Name</th><th>CPU</th><th>Memory</th></tr>");
        for p in &s.processes {
            write!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.2}%</td></tr>",
                p.pid,
                escape(&p.name),
                p.cpu_percent,
                p.memory_percent
            )?;
        }
        out.push_str("</table>");
    }
    out.push_str("</section></body></html>");
    Ok(())
}

fn row(out: &mut String, label: &str, value: &str) -> fmt::Result {
    write!(out, "<tr><th>{}</th><td>{}</td></tr>", label, escape(value))
}

fn unavailable(out: &mut String) {
    out.push_str("<p class=\"muted\">unavailable</p>");
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
