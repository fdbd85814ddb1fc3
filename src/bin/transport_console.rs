use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use std::io::{self, BufRead, Write};

use transport_records::config::EnvironmentConfig;
use transport_records::controllers::{FormState, Outcome};
use transport_records::database::TableView;
use transport_records::models::EntityKind;
use transport_records::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    transport_records::init_tracing("warn");

    println!("{}", "🚚 Sistema de Gestión de Transportes".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());

    let config = EnvironmentConfig::from_env()?;
    let state = AppState::connect(config).await;

    // Un formulario por entidad; su estado sobrevive entre menús
    let mut forms: Vec<FormState> = EntityKind::ALL.iter().map(|kind| FormState::new(*kind)).collect();

    match main_menu(&state, &mut forms).await {
        Err(e) if is_end_of_input(&e) => {
            println!();
            println!("{}", "👋 Fin de la entrada. ¡Hasta luego!".bright_green());
            Ok(())
        }
        other => other,
    }
}

async fn main_menu(state: &AppState, forms: &mut [FormState]) -> Result<()> {
    loop {
        println!();
        if !state.is_connected().await {
            println!(
                "{}",
                "ATENCIÓN: no hay conexión con la base de datos. Las operaciones fallarán.".bright_red()
            );
        }
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        for (i, kind) in EntityKind::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, kind.descriptor().label);
        }
        println!("7. 🔄 Reconectar");
        println!("0. 🚪 Salir");

        let choice = prompt("Selecciona una opción: ")?;
        match choice.as_str() {
            "0" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            "7" => match state.reconnect().await {
                Ok(backend) => println!("{} {}", "✅ Conectado a".bright_green(), backend),
                Err(e) => println!("{} {}", "❌".bright_red(), e.status_message()),
            },
            other => match other.parse::<usize>() {
                Ok(n) if (1..=forms.len()).contains(&n) => {
                    form_menu(state, &mut forms[n - 1]).await?;
                }
                _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
            },
        }
    }

    Ok(())
}

async fn form_menu(state: &AppState, form: &mut FormState) -> Result<()> {
    let descriptor = form.kind().descriptor();

    loop {
        println!();
        println!("{}", format!("📝 {}", descriptor.label).bright_cyan().bold());
        for field in descriptor.fields {
            println!("   {}: {}", field.label, form.field(field.column).bright_white());
        }
        if !form.status.is_empty() {
            println!("   {} {}", "Estado:".bright_yellow(), form.status);
        }
        println!("1. Editar campos");
        println!("2. Registrar");
        println!("3. Actualizar");
        println!("4. Eliminar");
        println!("5. Listar");
        println!("6. Limpiar campos");
        println!("0. Volver");

        let choice = prompt("Selecciona una opción: ")?;
        let controller = state.controller(form.kind()).await;

        let outcome = match choice.as_str() {
            "0" => return Ok(()),
            "1" => {
                for field in descriptor.fields {
                    let label = format!("{} [{}]: ", field.label, form.field(field.column));
                    let value = prompt(&label)?;
                    // Enter conserva el valor; "-" lo vacía
                    match value.as_str() {
                        "" => {}
                        "-" => form.set_field(field.column, ""),
                        _ => form.set_field(field.column, value),
                    }
                }
                continue;
            }
            "2" => form.submit_create(&controller).await,
            "3" => {
                form.update_id = prompt("ID para actualizar: ")?;
                form.submit_update(&controller).await
            }
            "4" => {
                form.delete_id = prompt("ID para eliminar: ")?;
                form.submit_delete(&controller).await
            }
            "5" => {
                match controller.list().await {
                    Ok(view) => print_table(&view),
                    Err(e) => println!("{} {}", "❌".bright_red(), e.status_message()),
                }
                continue;
            }
            "6" => {
                form.clear_fields();
                continue;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        let status = match outcome {
            Some(o) if o.is_success() => form.status.bright_green(),
            Some(Outcome::NothingToUpdate) => form.status.bright_yellow(),
            _ => form.status.bright_red(),
        };
        println!("{}", status);
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    read_input(&mut io::stdin().lock())
}

/// Leer una línea recortada; la entrada cerrada es `UnexpectedEof`
fn read_input<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "entrada cerrada"));
    }
    Ok(input.trim().to_string())
}

fn is_end_of_input(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .map(|e| e.kind() == io::ErrorKind::UnexpectedEof)
        .unwrap_or(false)
}

fn print_table(view: &TableView) {
    if view.is_empty() {
        println!("{}", "Sin resultados.".bright_yellow());
        return;
    }

    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.chars().count()).collect();
    for row in &view.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", render(&view.columns).bright_blue().bold());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for row in &view.rows {
        println!("{}", render(row));
    }
    println!("{}", format!("{} registro(s)", view.rows.len()).bright_white());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_input_trims_lines() {
        let mut input = Cursor::new("  2 \n\n");
        assert_eq!(read_input(&mut input).unwrap(), "2");
        assert_eq!(read_input(&mut input).unwrap(), "");
    }

    #[test]
    fn test_closed_input_ends_the_console() {
        let mut input = Cursor::new("0");
        assert_eq!(read_input(&mut input).unwrap(), "0");

        let error = read_input(&mut input).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
        assert!(is_end_of_input(&anyhow::Error::from(error)));
        assert!(!is_end_of_input(&anyhow::anyhow!("otro error")));
    }
}
