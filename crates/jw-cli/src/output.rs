//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use jw_core::analytics::{Kpi, TrendTone};
use jw_core::dashboard::Overview;
use jw_core::integrations::{Integration, IntegrationStatus};
use jw_core::kanban::{Board, Column};
use jw_core::model::{Task, TaskStatus};
use jw_core::pulse::PulseSummary;

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// First eight characters of an id.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Lane-coloured label.
fn lane_colored(status: TaskStatus, label: &str) -> ColoredString {
    match status {
        TaskStatus::ParkingLot => label.white().dimmed(),
        TaskStatus::ToDo => label.blue().bold(),
        TaskStatus::Doing => label.truecolor(255, 150, 66).bold(),
        TaskStatus::Done => label.green().bold(),
    }
}

fn column_header_plain(column: &Column, max_width: usize) -> String {
    let full = format!("{} {}", column.title.to_uppercase(), column.count);
    truncate_visual(&full, max_width)
}

/// One board cell: title plus a subtask counter when there are subtasks.
fn format_task_card(task: &Task, width: usize) -> String {
    let (done, total) = task.subtask_progress();
    let suffix = if total > 0 {
        format!(" {}/{}", done, total)
    } else {
        String::new()
    };
    let title_width = width.saturating_sub(2 + UnicodeWidthStr::width(suffix.as_str())).max(1);
    let title = truncate_visual(&task.title, title_width);
    pad_right(&format!("  {}{}", title, suffix), width)
}

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    println!("{:<10} {:<34} {:<12} {:<16}", "ID", "Title", "Lane", "Owner");
    println!("{}", "─".repeat(74));

    for task in tasks {
        println!(
            "{:<10} {} {} {:<16}",
            short_id(&task.id),
            pad_right(&truncate_visual(&task.title, 34), 34),
            lane_colored(task.status, &pad_right(task.status.as_str(), 12)),
            truncate_visual(&task.owner, 16)
        );
    }

    println!();
    println!("{} task(s) total", tasks.len());
}

/// Print one task with its details.
pub fn print_task(task: &Task) {
    println!("{} {}", task.title.cyan().bold(), format!("({})", task.id).dimmed());
    println!();
    if !task.description.is_empty() {
        println!("{}", task.description);
        println!();
    }
    println!("{}: {}", "Lane".bold(), lane_colored(task.status, task.status.title()));
    println!("{}: {}", "Owner".bold(), task.owner);
    if let Some(due) = &task.due_date {
        println!("{}: {}", "Due".bold(), due);
    }
    if !task.subtasks.is_empty() {
        println!();
        println!("{}", "Subtasks".bold());
        for (i, subtask) in task.subtasks.iter().enumerate() {
            println!("  {}. {}", i, subtask);
        }
    }
    if !task.ai_recommendations.is_empty() {
        println!();
        println!("{}", "AI recommendations".bold());
        for rec in &task.ai_recommendations {
            println!("  {} {}", "✦".truecolor(255, 150, 66), rec);
        }
    }
}

/// Print the Kanban board.
pub fn print_board(board: &Board) {
    if board.total == 0 {
        println!("{}", "No tasks found. Create tasks with 'jw task new <title>'.".dimmed());
        return;
    }

    let width = term_width();
    if width < 60 {
        print_board_compact(board);
    } else {
        print_board_wide(board, width);
    }
}

/// Four lanes side by side.
fn print_board_wide(board: &Board, term_w: usize) {
    let columns = &board.columns;
    let num_cols = columns.len();
    let available = term_w.saturating_sub(num_cols + 1);
    let col_width = (available / num_cols).clamp(12, 35);

    let rule = |left: &str, mid: &str, right: &str| {
        let mut line = left.to_string();
        for i in 0..num_cols {
            line.push_str(&"─".repeat(col_width));
            line.push_str(if i < num_cols - 1 { mid } else { right });
        }
        println!("{}", line.dimmed());
    };

    rule("┌", "┬", "┐");
    print!("{}", "│".dimmed());
    for column in columns {
        let plain = column_header_plain(column, col_width);
        let padding = col_width.saturating_sub(UnicodeWidthStr::width(plain.as_str()));
        let left_pad = padding / 2;
        print!(
            "{}{}{}{}",
            " ".repeat(left_pad),
            lane_colored(column.status, &plain),
            " ".repeat(padding - left_pad),
            "│".dimmed()
        );
    }
    println!();
    rule("├", "┼", "┤");

    let max_tasks = columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    for i in 0..max_tasks {
        print!("{}", "│".dimmed());
        for column in columns {
            match column.tasks.get(i) {
                Some(task) => {
                    let card = format_task_card(task, col_width);
                    match column.status {
                        TaskStatus::Done => print!("{}", card.green().dimmed()),
                        TaskStatus::Doing => print!("{}", card.truecolor(255, 150, 66)),
                        _ => print!("{}", card),
                    }
                }
                None => print!("{}", " ".repeat(col_width)),
            }
            print!("{}", "│".dimmed());
        }
        println!();
    }
    rule("└", "┴", "┘");

    let done = board.count(TaskStatus::Done);
    println!(
        " {} {} tasks {} {} done ({}%)",
        "■".cyan(),
        board.total.to_string().bold(),
        "·".dimmed(),
        done.to_string().green(),
        (done * 100) / board.total
    );
}

/// Compact vertical board layout for narrow terminals.
fn print_board_compact(board: &Board) {
    println!("{}", " KANBAN BOARD ".on_blue().white().bold());
    println!();

    for column in &board.columns {
        if column.tasks.is_empty() {
            continue;
        }
        println!(
            " {} {}",
            "▸".dimmed(),
            lane_colored(column.status, &column_header_plain(column, 30))
        );
        for task in &column.tasks {
            println!("   {} {}", task.title, short_id(&task.id).dimmed());
        }
        println!();
    }
}

/// Print the dashboard overview.
pub fn print_overview(overview: &Overview) {
    println!("{}", overview.tagline.bold());
    println!();
    for lane in &overview.lanes {
        println!(
            "  {} {}",
            lane_colored(lane.status, &pad_right(&lane.title, 12)),
            lane.count
        );
    }
    println!();
    println!("{}: {}%", "Sprint progress".bold(), overview.sprint_progress);
    println!("{}: {}/5", "Team happiness".bold(), overview.team_happiness);

    if !overview.todays_focus.is_empty() {
        println!();
        println!("{}", "Today's focus".bold());
        for item in &overview.todays_focus {
            println!(
                "  {} {} {}",
                lane_colored(item.status, "●"),
                item.title,
                format!("({})", item.owner).dimmed()
            );
        }
    }

    println!();
    println!("{}", "Team".bold());
    for member in &overview.team {
        println!(
            "  {} {} {}",
            member.avatar.as_deref().unwrap_or("👤"),
            member.name,
            member.role.as_str().dimmed()
        );
    }
}

fn tone_colored(tone: TrendTone, text: &str) -> ColoredString {
    match tone {
        TrendTone::Good => text.green(),
        TrendTone::Bad => text.red(),
        TrendTone::Neutral => text.normal(),
    }
}

/// Text progress bar, `width` cells wide.
fn meter(percent: i64, width: usize) -> String {
    let filled = ((percent.clamp(0, 100) as usize) * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Print KPI cards as rows.
pub fn print_kpis(kpis: &[Kpi]) {
    println!(
        "{:<28} {:>10} {:>10} {:>9}  {}",
        "KPI", "Current", "Target", "Change", "Progress"
    );
    println!("{}", "─".repeat(80));
    for kpi in kpis {
        let on_track = if kpi.is_on_track() { "✓".green() } else { "·".dimmed() };
        println!(
            "{:<28} {:>10} {:>10} {} {} {} {}%",
            truncate_visual(&kpi.name, 28),
            kpi.display_current(),
            kpi.display_target(),
            tone_colored(kpi.tone(), &format!("{:>9}", kpi.display_change())),
            meter(kpi.progress_percent(), 16).cyan(),
            on_track,
            kpi.progress_percent()
        );
    }
}

/// Print the happiness pulse summary.
pub fn print_pulse_summary(summary: &PulseSummary) {
    println!(
        "{}: {:.1}/5 from {} response(s) {}",
        "Average".bold(),
        summary.average,
        summary.responses,
        format!("(baseline {:.1}, {:?})", summary.baseline_average, summary.trend).dimmed()
    );
    println!();
    let max = summary.distribution.iter().copied().max().unwrap_or(0).max(1);
    for (i, count) in summary.distribution.iter().enumerate() {
        let level = jw_core::pulse::level((i + 1) as u8);
        let label = level.map(|l| l.label).unwrap_or_default();
        println!(
            "  {} {:<13} {} {}",
            i + 1,
            label,
            "█".repeat((count * 20) / max).cyan(),
            count
        );
    }
    if !summary.top_suggestions.is_empty() {
        println!();
        println!("{}", "Top suggestions".bold());
        for s in &summary.top_suggestions {
            println!("  {} {} {}", "•".dimmed(), s.suggestion, format!("×{}", s.count).dimmed());
        }
    }
}

fn status_colored(status: IntegrationStatus, width: usize) -> ColoredString {
    let label = pad_right(status.as_str(), width);
    match status {
        IntegrationStatus::Connected => label.green(),
        IntegrationStatus::Disconnected => label.dimmed(),
        IntegrationStatus::Error => label.red(),
        IntegrationStatus::Syncing => label.yellow(),
    }
}

/// Print the integration catalogue.
pub fn print_integrations(integrations: &[Integration]) {
    println!("{:<14} {:<20} {:<14} {:<13} {}", "ID", "Name", "Category", "Status", "Last sync");
    println!("{}", "─".repeat(76));
    for integration in integrations {
        println!(
            "{:<14} {:<20} {:<14} {} {}",
            integration.id,
            integration.name,
            integration.category.as_str(),
            status_colored(integration.status, 13),
            integration.last_sync.as_deref().unwrap_or("-").dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_wide_chars() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("Update customer health scores", 10), "Update c..");
        let wide = truncate_visual("顧客の健康スコア", 8);
        assert!(UnicodeWidthStr::width(wide.as_str()) <= 8);
    }

    #[test]
    fn test_pad_and_meter() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(meter(50, 10), "█████░░░░░");
        assert_eq!(meter(150, 4), "████");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }

    #[test]
    fn test_task_card_shows_subtasks() {
        let mut task = Task::new("Plan QBR", TaskStatus::ToDo);
        task.subtasks = vec!["Agenda".into(), "".into()];
        let card = format_task_card(&task, 20);
        assert_eq!(UnicodeWidthStr::width(card.as_str()), 20);
        assert!(card.contains("Plan QBR"));
    }
}
