use fetch_dependencies::{Event, EventKind};

use indicatif::{ProgressBar, ProgressStyle};

fn make_progress_spinner(prefix: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{prefix:.cyan.bold/blue.bold} 🔎 {msg:.cyan/blue} {spinner}")
            .unwrap()
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"),
    );
    pb.set_prefix(prefix);
    pb
}

fn complete_progress_bar(pb: ProgressBar, success: bool, status: String) {
    let template = if success {
        "{prefix:.cyan.bold/blue.bold} {msg:.cyan/blue}"
    } else {
        "{prefix:.cyan.bold/blue.bold} {msg:.red.bold}"
    };
    pb.set_style(ProgressStyle::with_template(template).unwrap());
    pb.finish_with_message(status);
}

fn prefix(event: &Event<'_>) -> String {
    format!(
        "{}[{}/{}]",
        "  ".repeat(event.depth),
        event.position,
        event.count
    )
}

/// Shows one spinner at a time for the dependency being fetched. Lines which must be seen even
/// when stdout isn't a terminal are printed directly.
#[derive(Debug, Default)]
pub struct Progress {
    bar: Option<ProgressBar>,
    fetched: usize,
    skipped: usize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn finish(&mut self, success: bool, status: String) -> bool {
        match self.bar.take() {
            Some(bar) => {
                complete_progress_bar(bar, success, status);
                true
            }
            None => false,
        }
    }

    pub fn report(&mut self, event: &Event<'_>) {
        let indent = "  ".repeat(event.depth);
        match event.kind {
            EventKind::Satisfied => {
                self.skipped += 1;
                self.println(format!("{indent}✅ {event}"));
            }
            EventKind::Adding { .. } => {
                self.finish(true, String::new());
                let bar = make_progress_spinner(prefix(event));
                bar.set_message(event.to_string());
                self.bar = Some(bar);
            }
            EventKind::Checkout { .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(event.to_string());
                }
            }
            EventKind::Leaf => self.println(format!("{indent}🍃 {event}")),
            EventKind::NestedManifest { .. } | EventKind::NestedScript { .. } => {
                // Nested dependencies report their own progress, so hand over the terminal
                self.finish(
                    true,
                    format!("😸 {} -> {}", event.dependency, event.path.display()),
                );
                self.println(format!("{indent}🔗 {event}"));
            }
            EventKind::Fetched => {
                self.fetched += 1;
                let status = format!("😸 {} -> {}", event.dependency, event.path.display());
                if !self.finish(true, status) {
                    self.println(format!("{indent}✅ {event}"));
                }
            }
            EventKind::Failed { stage } => {
                let status = format!("😿 failed to {stage} '{}'", event.dependency);
                if !self.finish(false, status) {
                    self.println(format!("{indent}❌ {event}"));
                }
            }
        }
    }

    /// Finish any remaining spinner and summarise what was done.
    pub fn summary(mut self) {
        self.finish(true, String::new());
        println!(
            "\n🎉 Fetched {} dependencies ({} already satisfied)",
            self.fetched, self.skipped
        );
    }
}
