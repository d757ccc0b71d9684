//! CLI command implementations

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::brigadistas::{BrigadistaUpdate, NewBrigadista};
use crate::api::ubicaciones::{self, UbicacionInput};
use crate::api::usuarios::{NewUsuario, UserAction, UsuarioUpdate};
use crate::api::ApiClient;
use crate::auth::{Navigator, Route, RouteGuard, SessionStore};
use crate::cli::{
    confirm, error, info, print_brigadistas, print_identity, print_qr_codes, print_reporte_detail,
    print_reportes, print_stats, print_ubicaciones, print_usuarios, render, success, toast, warn,
    BrigadistasAction, OutputFormat, ReportesAction, UbicacionArgs, UbicacionesAction,
    UsuariosAction,
};
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::notifications::{self, Notifications, Toast};

/// Sends the user back to the sign-in step by telling them how to get there
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => warn("You are signed out. Run 'brigadmin login' to continue."),
            Route::Dashboard => info("Run 'brigadmin reportes stats' for the dashboard"),
        }
    }
}

/// Everything a command needs to talk to the API
struct Console {
    client: ApiClient,
    guard: RouteGuard,
    toasts: broadcast::Receiver<Toast>,
}

impl Console {
    fn open() -> Result<Self> {
        let config = config::load_config()?;
        let session = SessionStore::from_config(&config.session)?;
        let navigator: Arc<dyn Navigator> = Arc::new(TerminalNavigator);
        let notifications = Notifications::new();
        let toasts = notifications.subscribe();

        let client = ApiClient::from_config(
            &config.api,
            session.clone(),
            Arc::clone(&navigator),
            notifications,
        )?;
        let guard = RouteGuard::new(session, navigator);

        Ok(Self {
            client,
            guard,
            toasts,
        })
    }

    /// Open a console for admin-only commands
    fn admin() -> Result<Self> {
        let console = Self::open()?;
        console.guard.require()?;
        Ok(console)
    }

    fn session(&self) -> &SessionStore {
        self.client.session()
    }

    /// Show queued toasts, then hand back the command's result
    fn finish<T>(mut self, result: crate::error::Result<T>) -> Result<T> {
        for t in notifications::drain(&mut self.toasts) {
            toast(&t);
        }
        Ok(result?)
    }
}

/// Initialize a new brigadmin.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Edit the API URL if needed and run 'brigadmin login'");

    Ok(())
}

/// Sign in with email and password
pub async fn login(email: Option<String>, password: Option<String>) -> Result<()> {
    let console = Console::open()?;

    let email = match email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    let result = console.client.login(&email, &password).await;
    match console.finish(result) {
        Ok(true) => {
            success(&format!("Signed in as {}", email));
            Ok(())
        }
        Ok(false) => {
            error("The server accepted the credentials but returned no token");
            Ok(())
        }
        Err(e) => {
            error("Invalid credentials. Check them and try again.");
            Err(e)
        }
    }
}

/// Clear the stored session
pub async fn logout() -> Result<()> {
    let console = Console::open()?;
    console.client.logout()?;
    success("Signed out");
    Ok(())
}

/// Show the current identity
pub async fn whoami(format: OutputFormat) -> Result<()> {
    let console = Console::open()?;
    let evaluator = console.session().evaluator();

    match evaluator.claims() {
        Some(claims) => {
            let authenticated = console.session().is_authenticated();
            render(&claims, format, |c| print_identity(c, authenticated))?;
        }
        None => info("Not signed in. Run 'brigadmin login'"),
    }
    Ok(())
}

/// Brigadista management commands
pub async fn brigadistas(action: BrigadistasAction) -> Result<()> {
    let console = Console::admin()?;
    let api = console.client.brigadistas();

    match action {
        BrigadistasAction::List { format } => {
            let list = api.list().await;
            let list = console.finish(list)?;
            render(list.as_slice(), format, print_brigadistas)?;
        }
        BrigadistasAction::Create {
            nombre,
            correo,
            telefono,
            inactive,
        } => {
            let data = NewBrigadista {
                nombre,
                correo,
                telefono,
                activo: !inactive,
            };
            let created = api.create(&data).await;
            let created = console.finish(created)?;
            success(&format!("Created brigadista #{}", created.id));
        }
        BrigadistasAction::Update {
            id,
            nombre,
            correo,
            telefono,
            activo,
        } => {
            let update = BrigadistaUpdate {
                nombre,
                correo,
                telefono,
                activo,
            };
            if update.is_empty() {
                warn("Nothing to update");
                return Ok(());
            }
            let result = api.update(id, &update).await;
            console.finish(result)?;
            success(&format!("Updated brigadista #{}", id));
        }
        BrigadistasAction::Delete { id, force } => {
            if !force && !confirm(&format!("Delete brigadista #{}?", id)) {
                info("Cancelled");
                return Ok(());
            }
            let result = api.delete(id).await;
            console.finish(result)?;
            success(&format!("Deleted brigadista #{}", id));
        }
    }

    Ok(())
}

fn location_input(fields: UbicacionArgs) -> Result<UbicacionInput> {
    let input = UbicacionInput {
        sede: fields.sede,
        edificio: fields.edificio,
        piso: fields.piso,
        lugar: fields.lugar,
        descripcion: fields.descripcion,
    };
    let missing = input.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("Missing required fields: {}", missing.join(", "));
    }
    Ok(input)
}

/// Location management commands
pub async fn ubicaciones(action: UbicacionesAction) -> Result<()> {
    let console = Console::admin()?;
    let api = console.client.ubicaciones();

    match action {
        UbicacionesAction::List { search, format } => {
            let list = api.list().await;
            let list = console.finish(list)?;
            let matches = ubicaciones::filter(&list, search.as_deref().unwrap_or(""));
            render(matches.as_slice(), format, print_ubicaciones)?;
        }
        UbicacionesAction::Show { id, format } => {
            let found = api.get(id).await;
            let found = console.finish(found)?;
            render(&found, format, |u| print_ubicaciones(&[u]))?;
        }
        UbicacionesAction::Create { fields } => {
            let input = location_input(fields)?;
            let created = api.create(&input).await;
            let created = console.finish(created)?;
            success(&format!("Created location #{}", created.id));
        }
        UbicacionesAction::Update { id, fields } => {
            let input = location_input(fields)?;
            let result = api.update(id, &input).await;
            console.finish(result)?;
            success(&format!("Updated location #{}", id));
        }
        UbicacionesAction::Delete { id, force } => {
            if !force && !confirm(&format!("Delete location #{}?", id)) {
                info("Cancelled");
                return Ok(());
            }
            let result = api.delete(id).await;
            console.finish(result)?;
            success(&format!("Deleted location #{}", id));
        }
        UbicacionesAction::Qr {
            ids,
            search,
            format,
        } => {
            let list = api.list().await;
            let list = console.finish(list)?;
            let selected: Vec<_> = ubicaciones::filter(&list, search.as_deref().unwrap_or(""))
                .into_iter()
                .filter(|u| ids.is_empty() || ids.contains(&u.id))
                .collect();

            if selected.is_empty() {
                info("Select at least one location");
                return Ok(());
            }

            #[derive(serde::Serialize)]
            struct QrEntry {
                id: i64,
                file: String,
                payload: String,
            }
            let entries: Vec<QrEntry> = selected
                .iter()
                .map(|u| QrEntry {
                    id: u.id,
                    file: u.qr_file_name(),
                    payload: u.qr_payload(),
                })
                .collect();
            render(entries.as_slice(), format, |_| print_qr_codes(&selected))?;
        }
    }

    Ok(())
}

/// Report browsing commands
pub async fn reportes(action: ReportesAction) -> Result<()> {
    let console = Console::admin()?;
    let api = console.client.reportes();

    match action {
        ReportesAction::List { format } => {
            let list = api.list().await;
            let list = console.finish(list)?;
            render(list.as_slice(), format, print_reportes)?;
        }
        ReportesAction::Show { id, format } => {
            let found = api.get(id).await;
            let found = console.finish(found)?;
            render(&found, format, print_reporte_detail)?;
        }
        ReportesAction::Audio { id, output } => {
            let audio = api.audio(id).await;
            let audio = console.finish(audio)?;
            if audio.is_empty() {
                warn(&format!("Report #{} has no audio", id));
                return Ok(());
            }
            let path = output.unwrap_or_else(|| PathBuf::from(format!("reporte_{}.audio", id)));
            fs::write(&path, &audio)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            success(&format!("Saved {} bytes to {}", audio.len(), path.display()));
        }
        ReportesAction::Stats { format } => {
            let stats = api.stats().await;
            let stats = console.finish(stats)?;
            render(&stats, format, print_stats)?;
        }
    }

    Ok(())
}

/// User account commands
pub async fn usuarios(action: UsuariosAction) -> Result<()> {
    let console = Console::admin()?;
    let api = console.client.usuarios();

    let (id, user_action) = match action {
        UsuariosAction::List { format } => {
            let list = api.list().await;
            let list = console.finish(list)?;
            render(list.as_slice(), format, print_usuarios)?;
            return Ok(());
        }
        UsuariosAction::Create {
            correo,
            nombre,
            password,
            brigadista,
        } => {
            let contrasena = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("Password for the new account")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?,
            };
            let data = NewUsuario {
                nombre,
                correo,
                contrasena,
                es_brigadista: brigadista,
                habilitado: true,
            };
            let result = api.create(&data).await;
            console.finish(result)?;
            success(&format!("Registered {}", data.correo));
            return Ok(());
        }
        UsuariosAction::Update {
            id,
            nombre,
            correo,
            password,
        } => {
            let update = UsuarioUpdate {
                nombre,
                correo,
                contrasena: password,
                ..Default::default()
            };
            let result = api.update(id, &update).await;
            console.finish(result)?;
            success(&format!("Updated user #{}", id));
            return Ok(());
        }
        UsuariosAction::Promote { id } => (id, UserAction::AssignBrigadista),
        UsuariosAction::Demote { id } => (id, UserAction::RemoveBrigadista),
        UsuariosAction::Disable { id } => (id, UserAction::Disable),
        UsuariosAction::Enable { id } => (id, UserAction::Enable),
    };

    let result = api.apply(id, user_action).await;
    console.finish(result)?;

    let message = match user_action {
        UserAction::AssignBrigadista => format!("User #{} is now a brigadista", id),
        UserAction::RemoveBrigadista => format!("User #{} is no longer a brigadista", id),
        UserAction::Disable => format!("User #{} disabled", id),
        UserAction::Enable => format!("User #{} enabled", id),
    };
    success(&message);

    Ok(())
}
