use console::style;

/// Startup banner for the interactive session
pub fn display_banner(model: &str) {
    println!(
        "{} {}",
        style("docchat").bold().cyan(),
        style(format!("({})", model)).dim()
    );
    println!(
        "{}",
        style("Load a document with /open <path>, then ask away. /help for commands.").dim()
    );
}

/// Render a final answer as markdown when it looks like markdown,
/// plain boxed text otherwise.
pub fn display_answer(answer: &str) {
    if answer.contains("```")
        || answer.contains('*')
        || answer.contains('`')
        || answer.contains('#')
    {
        display_markdown(answer);
    } else {
        display_response(answer);
    }
}

pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

/// Boxed plain-text response, wrapped to the terminal width
pub fn display_response(response: &str) {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let max_width = std::cmp::min(terminal_width.saturating_sub(4), 100).max(40);

    let wrapped: Vec<String> = response
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect();

    let content_width = wrapped.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = content_width + 4;

    let top = format!("┌{}┐", "─".repeat(box_width - 2));
    let bottom = format!("└{}┘", "─".repeat(box_width - 2));

    println!("{}", style(&top).dim().blue());
    for line in &wrapped {
        let padding = box_width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", line, " ".repeat(padding));
    }
    println!("{}", style(&bottom).dim().blue());
}

pub fn display_info(message: &str) {
    println!("{}", style(message).dim());
}

pub fn display_error(error: &impl std::fmt::Display) {
    eprintln!("{} {}", style("✗").bold().red(), style(error).red());
}
