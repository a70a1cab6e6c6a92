use alerter::Alert;
use analytics::{DailyCost, PerformanceStatistics, PhaseAnalysis};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use core_types::Lot;
use engine::{LotRanking, LotReport};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn per_unit(value: Option<Decimal>) -> String {
    value.map_or_else(|| "sin datos".to_string(), |v| v.round_dp(4).to_string())
}

fn pct(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}%", v.round_dp(1)))
}

pub fn print_lots(lots: &[Lot]) {
    let mut table = table(&["Id", "Lote", "Raza", "Aves iniciales", "Aves actuales", "Inicio"]);
    for lot in lots {
        table.add_row(vec![
            Cell::new(lot.id),
            Cell::new(&lot.name),
            Cell::new(&lot.breed),
            Cell::new(lot.initial_bird_count),
            Cell::new(lot.current_bird_count),
            Cell::new(lot.start_date),
        ]);
    }
    println!("{table}");
}

pub fn print_daily(series: &[DailyCost]) {
    let mut table = table(&["Fecha", "Huevos", "Gasto", "Costo por huevo"]);
    for day in series {
        table.add_row(vec![
            Cell::new(day.date),
            Cell::new(day.units),
            Cell::new(money(day.total_expense)),
            Cell::new(per_unit(day.cost_per_unit)),
        ]);
    }
    println!("{table}");
}

pub fn print_phases(analysis: &PhaseAnalysis) {
    let initial = &analysis.initial;
    let mut table = table(&["Fase", "Indicador", "Valor"]);
    let mut row = |phase: &str, label: &str, value: String| {
        table.add_row(vec![phase.to_string(), label.to_string(), value]);
    };

    row("Inicial", "Periodo", format!("{} a {}", initial.start_date, initial.end_date));
    row("Inicial", "Costo total", money(initial.total_cost));
    row("Inicial", "Costo por ave", money(initial.cost_per_bird));
    row(
        "Inicial",
        "Costo por ave actual",
        initial.cost_per_surviving_bird.map_or_else(|| "-".to_string(), money),
    );

    match &analysis.productive {
        Some(productive) => {
            row("Productiva", "Inicio", productive.start_date.to_string());
            row("Productiva", "Huevos producidos", productive.total_units.to_string());
            row("Productiva", "Gasto de mantenimiento", money(productive.total_expense));
            row(
                "Productiva",
                "Costo promedio por huevo",
                per_unit(productive.average_cost_per_unit),
            );
            for (label, day) in [("Mejor día", &productive.best_day), ("Peor día", &productive.worst_day)] {
                if let Some(day) = day {
                    row("Productiva", label, format!("{} ({})", day.date, per_unit(day.cost_per_unit)));
                }
            }
        }
        None => row("Productiva", "Estado", "sin producción registrada".to_string()),
    }

    row("Total", "Costo total del lote", money(analysis.total_lot_cost));
    row("Total", "Costo por huevo", per_unit(analysis.lifetime_cost_per_unit));
    row("Total", "Rentabilidad", pct(analysis.rentability_pct));
    println!("{table}");
}

pub fn print_statistics(stats: &PerformanceStatistics) {
    let mut table = table(&["Indicador", "Valor"]);
    table.add_row(vec![
        "Periodo".to_string(),
        format!("{} a {} ({} días)", stats.period_start, stats.period_end, stats.window_days),
    ]);
    table.add_row(vec!["Huevos".to_string(), stats.total_units.to_string()]);
    table.add_row(vec!["Huevos por día".to_string(), stats.average_units_per_day.round_dp(1).to_string()]);
    table.add_row(vec!["Gasto por día".to_string(), money(stats.average_daily_expense)]);
    table.add_row(vec!["Costo promedio por huevo".to_string(), per_unit(stats.average_cost_per_unit)]);
    table.add_row(vec!["Eficiencia".to_string(), pct(stats.efficiency_pct)]);
    table.add_row(vec!["Postura".to_string(), pct(stats.laying_rate_pct)]);
    table.add_row(vec!["Tendencia del costo".to_string(), format!("{:?}", stats.cost_trend)]);
    for category in &stats.expense_breakdown {
        table.add_row(vec![
            format!("Gasto {}", category.category.label()),
            money(category.total),
        ]);
    }
    println!("{table}");
}

pub fn print_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("Sin alertas.");
        return;
    }
    let mut table = table(&["Severidad", "Tipo", "Mensaje", "Acción recomendada"]);
    for alert in alerts {
        table.add_row(vec![
            Cell::new(format!("{:?}", alert.severity)),
            Cell::new(format!("{:?}", alert.kind)),
            Cell::new(&alert.message),
            Cell::new(&alert.recommended_action),
        ]);
    }
    println!("{table}");
}

fn print_ranking(ranking: &LotRanking) {
    let position = ranking
        .position
        .map_or_else(|| "sin posición".to_string(), |p| format!("{p} de {}", ranking.ranked_lots));
    println!("Ranking por costo por huevo: {position}");
    if let Some(best) = &ranking.best_lot {
        println!("Mejor lote: {} ({})", best.name, per_unit(Some(best.cost_per_unit)));
    }
}

pub fn print_report(report: &LotReport) {
    println!("Lote {} ({}) al {}", report.lot.name, report.lot.id, report.as_of);
    print_daily(std::slice::from_ref(&report.daily_cost));
    print_phases(&report.phases);
    print_statistics(&report.statistics);
    print_alerts(&report.alerts);
    if let Some(ranking) = &report.ranking {
        print_ranking(ranking);
    }
}
