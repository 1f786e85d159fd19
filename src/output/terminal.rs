// Colored terminal output for predictions and evaluation reports.

use colored::Colorize;

use crate::inference::Label;
use crate::metrics::{ClassificationReport, LABEL_ORDER};

/// Colorize a label: spam in red, not spam in green.
pub fn colorize_label(label: Label) -> colored::ColoredString {
    match label {
        Label::Spam => label.as_str().red().bold(),
        Label::NotSpam => label.as_str().green(),
    }
}

/// Print one prediction, optionally with the class probabilities.
pub fn display_prediction(text: &str, label: Label, spam_probability: Option<f64>) {
    println!("  {}  {}", colorize_label(label), super::truncate_chars(text, 80).dimmed());
    if let Some(p) = spam_probability {
        println!("  {} {:.3}", "P(spam):".dimmed(), p);
    }
}

/// Print accuracy, the per-class table, averages and the confusion matrix.
pub fn display_report(title: &str, report: &ClassificationReport) {
    println!("\n{}", format!("=== {title} ===").bold());
    println!();
    println!("  Accuracy: {}", format!("{:.4}", report.accuracy).bold());
    println!();

    println!(
        "  {:<14} {:>9} {:>9} {:>9} {:>9}",
        "".dimmed(),
        "precision".dimmed(),
        "recall".dimmed(),
        "f1-score".dimmed(),
        "support".dimmed(),
    );
    println!("  {}", "-".repeat(54).dimmed());

    for class in &report.per_class {
        println!(
            "  {:<14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
            class.label.as_str(),
            class.precision,
            class.recall,
            class.f1,
            class.support,
        );
    }
    println!();
    for (name, avg) in [
        ("macro avg", &report.macro_avg),
        ("weighted avg", &report.weighted_avg),
    ] {
        println!(
            "  {:<14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
            name, avg.precision, avg.recall, avg.f1, avg.support,
        );
    }

    display_confusion_matrix(report);
}

fn display_confusion_matrix(report: &ClassificationReport) {
    println!("\n  {}", "Confusion matrix (rows actual, columns predicted)".bold());
    println!(
        "  {:<14} {:>10} {:>10}",
        "",
        LABEL_ORDER[0].as_str().dimmed(),
        LABEL_ORDER[1].as_str().dimmed()
    );
    for (row, label) in LABEL_ORDER.iter().enumerate() {
        let counts = report.confusion.counts[row];
        // Diagonal cells are correct predictions.
        let cell = |col: usize| {
            let s = format!("{:>10}", counts[col]);
            if col == row {
                s.green().to_string()
            } else if counts[col] > 0 {
                s.red().to_string()
            } else {
                s
            }
        };
        println!("  {:<14} {} {}", label.as_str(), cell(0), cell(1));
    }
    println!();
}
