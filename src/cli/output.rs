//! CLI output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::api::brigadistas::Brigadista;
use crate::api::reportes::{ReportStats, Reporte};
use crate::api::ubicaciones::Ubicacion;
use crate::api::usuarios::Usuario;
use crate::auth::Claims;
use crate::cli::OutputFormat;
use crate::notifications::{Toast, ToastKind};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a toast with the marker matching its kind
pub fn toast(toast: &Toast) {
    match toast.kind {
        ToastKind::Success => success(&toast.message),
        ToastKind::Error => error(&toast.message),
        ToastKind::Warn => warn(&toast.message),
        ToastKind::Info => info(&toast.message),
    }
}

/// Render `value` as JSON or YAML, or hand it to `table` for the table view
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    table: impl FnOnce(&T),
) -> Result<()> {
    match format {
        OutputFormat::Table => table(value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

fn yes_no(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Red)
    }
}

/// Print a table of brigadistas
pub fn print_brigadistas(brigadistas: &[Brigadista]) {
    if brigadistas.is_empty() {
        info("No brigadistas found. Add one with 'brigadmin brigadistas create'");
        return;
    }

    let mut table = new_table(&["ID", "Name", "Email", "Phone", "Active"]);
    for b in brigadistas {
        table.add_row(vec![
            Cell::new(b.id),
            Cell::new(&b.nombre),
            Cell::new(&b.correo),
            Cell::new(b.telefono.as_deref().unwrap_or("-")),
            yes_no(b.activo),
        ]);
    }
    println!("{table}");
}

/// Print a table of locations
pub fn print_ubicaciones(ubicaciones: &[&Ubicacion]) {
    if ubicaciones.is_empty() {
        info("No locations found");
        return;
    }

    let mut table = new_table(&["ID", "Site", "Building", "Floor", "Place", "Description"]);
    for u in ubicaciones {
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(&u.sede),
            Cell::new(&u.edificio),
            Cell::new(&u.piso),
            Cell::new(&u.lugar),
            Cell::new(&u.descripcion),
        ]);
    }
    println!("{table}");
}

/// Print QR payloads and target file names for locations
pub fn print_qr_codes(ubicaciones: &[&Ubicacion]) {
    let mut table = new_table(&["ID", "File", "Payload"]);
    for u in ubicaciones {
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(u.qr_file_name()),
            Cell::new(u.qr_payload()),
        ]);
    }
    println!("{table}");
}

/// Print a table of reports
pub fn print_reportes(reportes: &[Reporte]) {
    if reportes.is_empty() {
        info("No reports found");
        return;
    }

    let mut table = new_table(&["ID", "State", "Created", "Site", "Reporter", "Audio"]);
    for r in reportes {
        let state_color = match r.estado.as_deref().map(str::to_lowercase).as_deref() {
            Some("pendiente") => Color::Yellow,
            Some("atendido") | Some("resuelto") | Some("cerrado") => Color::Green,
            _ => Color::White,
        };
        let created = match (&r.fecha_creacion, &r.hora_creacion) {
            (Some(date), Some(time)) => format!("{} {}", date, time),
            (Some(date), None) => date.clone(),
            _ => "unknown".to_string(),
        };
        table.add_row(vec![
            Cell::new(r.id_reporte),
            Cell::new(r.estado.as_deref().unwrap_or("-")).fg(state_color),
            Cell::new(created),
            Cell::new(
                r.ubicacion
                    .as_ref()
                    .and_then(|u| u.sede.as_deref())
                    .unwrap_or("-"),
            ),
            Cell::new(r.usuario.as_ref().map(|u| u.correo.as_str()).unwrap_or("-")),
            yes_no(r.has_audio()),
        ]);
    }
    println!("{table}");
}

/// Print detailed report information
pub fn print_reporte_detail(r: &Reporte) {
    println!("{}", "Report Details".bold().underline());
    println!();
    println!("  {} {}", "ID:".bold(), r.id_reporte);
    println!("  {} {}", "State:".bold(), r.estado.as_deref().unwrap_or("-"));
    println!(
        "  {} {} {}",
        "Created:".bold(),
        r.fecha_creacion.as_deref().unwrap_or("-"),
        r.hora_creacion.as_deref().unwrap_or("")
    );
    if let Some(usuario) = &r.usuario {
        println!("  {} {} <{}>", "Reporter:".bold(), usuario.nombre, usuario.correo);
    }
    if let Some(ubicacion) = &r.ubicacion {
        let parts: Vec<&str> = [&ubicacion.sede, &ubicacion.edificio, &ubicacion.lugar]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        println!("  {} {}", "Location:".bold(), parts.join(" / "));
    }
    if let Some(audio) = r.ruta_audio.as_deref().filter(|a| !a.is_empty()) {
        println!("  {} {}", "Audio:".bold(), audio.cyan());
    }
    println!();
    println!("  {}", r.descripcion);
}

fn print_counts(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    let mut table = new_table(&[title, "Reports"]);
    for (label, count) in counts {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{table}");
}

/// Print dashboard statistics
pub fn print_stats(stats: &ReportStats) {
    println!("{} {}", "Total reports:".bold(), stats.total);
    print_counts("Month", &stats.by_month);
    print_counts("Site", &stats.by_site);
    print_counts("State", &stats.by_state);

    let mut table = new_table(&["Audio", "Reports"]);
    table.add_row(vec![Cell::new("With audio"), Cell::new(stats.with_audio)]);
    table.add_row(vec![Cell::new("Without audio"), Cell::new(stats.without_audio)]);
    println!("{table}");
}

/// Print a table of user accounts
pub fn print_usuarios(usuarios: &[Usuario]) {
    if usuarios.is_empty() {
        info("No users found");
        return;
    }

    let mut table = new_table(&["ID", "Name", "Email", "Brigadista", "Enabled"]);
    for u in usuarios {
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(u.nombre.as_deref().unwrap_or("-")),
            Cell::new(&u.correo),
            yes_no(u.es_brigadista),
            yes_no(u.habilitado),
        ]);
    }
    println!("{table}");
}

/// Human-readable expiry; an `exp` that is not a usable instant is "invalid"
fn expiry_label(claims: &Claims) -> String {
    match (claims.exp, claims.expires_at()) {
        (None, _) => "never".to_string(),
        (Some(_), Some(at)) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        (Some(_), None) => "invalid".to_string(),
    }
}

/// Print who is signed in
pub fn print_identity(claims: &Claims, authenticated: bool) {
    println!("{}", "Session".bold().underline());
    println!();
    println!(
        "  {} {}",
        "Email:".bold(),
        claims.email.as_deref().unwrap_or("-")
    );
    let status = if authenticated {
        "active".green()
    } else {
        "expired".red()
    };
    println!("  {} {}", "Status:".bold(), status);
    println!("  {} {}", "Expires:".bold(), expiry_label(claims));
    println!("  {} {}", "Admin:".bold(), claims.is_admin());
    println!("  {} {}", "Brigadista:".bold(), claims.is_brigadista());
    if let Some(roles) = &claims.roles {
        println!("  {} {}", "Roles:".bold(), roles.join(", "));
    } else if let Some(role) = &claims.role {
        println!("  {} {}", "Role:".bold(), role);
    }
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
