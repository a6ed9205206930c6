//! Text rendering: currency, status line, structure list, notices.

use city_core::{CityError, StructureId};
use city_events::Event;
use city_runtime::{Session, SessionError};
use rust_decimal::Decimal;

pub const MENU: &str = "\
1) Add building
2) Add transport
3) Add park
4) Add factory
5) Add public service
6) Trigger event
7) Update selected structure
8) Remove selected structure
9) Select structure
0) Quit";

pub const GAME_OVER: &str = "You lost! The city budget reached zero.";

/// Format an amount as Brazilian reais, e.g. `R$ 100.000,00`.
pub fn brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac}")
}

/// Budget change with an explicit sign, e.g. `+R$ 25.000,00`.
fn signed_brl(change: Decimal) -> String {
    if change > Decimal::ZERO {
        format!("+{}", brl(change))
    } else {
        brl(change)
    }
}

pub fn status_line(session: &Session) -> String {
    format!(
        "Budget: {} | Resources: {}",
        brl(session.budget()),
        session.resources()
    )
}

pub fn structure_list(session: &Session, selected: Option<StructureId>) -> String {
    let structures = session.structures();
    if structures.is_empty() {
        return "(no structures yet)".to_string();
    }
    structures
        .iter()
        .enumerate()
        .map(|(i, (id, s))| {
            let marker = if Some(*id) == selected { '>' } else { ' ' };
            format!("{marker} {}. {s}", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn event_notice(event: &Event) -> String {
    format!(
        "Event: {}\nDescription: {}\nBudget impact: {}",
        event.name,
        event.description,
        signed_brl(-event.budget_impact())
    )
}

pub fn describe_error(err: &SessionError) -> String {
    match err {
        SessionError::City(CityError::InsufficientFunds { needed, available }) => format!(
            "Insufficient budget: need {}, have {}.",
            brl(*needed),
            brl(*available)
        ),
        SessionError::City(CityError::InsufficientResources { needed, available }) => {
            format!("Insufficient resources: need {needed}, have {available}.")
        }
        SessionError::City(CityError::NotFound(_)) => "No structure selected.".to_string(),
        SessionError::City(CityError::InvalidInput(msg)) => format!("Invalid input: {msg}."),
        SessionError::Ended => GAME_OVER.to_string(),
    }
}
