//! Colored terminal rendering of results.
//!
//! Every `render_*` function returns a borrowed view that implements
//! [`Display`](fmt::Display); the binary prints it.

use crate::gravity::GravityScore;
use crate::portfolio::PortfolioRow;
use crate::scoring::ScoredSite;
use crate::select::{SelectionModel, SelectionSolution, SolverStatus};
use colored::Colorize;
use std::fmt;

const BAR_WIDTH: usize = 40;

/// A horizontal bar of `value / max` scaled to `width` cells.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max.is_nan() || max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max).min(1.0) * width as f64).round() as usize;
    "█".repeat(cells)
}

/// Ranked weighted scores, optionally with a bar chart column.
pub struct ScoreReport<'a> {
    ranked: &'a [ScoredSite],
    chart: bool,
}

pub fn render_scores(ranked: &[ScoredSite], chart: bool) -> ScoreReport<'_> {
    ScoreReport { ranked, chart }
}

impl fmt::Display for ScoreReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("=== Site ranking ({} sites) ===", self.ranked.len());
        writeln!(f, "\n{}", title.bold())?;
        writeln!(
            f,
            "  {:>4}  {:<20} {:>8}",
            "Rank".dimmed(),
            "Site".dimmed(),
            "Score".dimmed()
        )?;
        writeln!(f, "  {}", "-".repeat(36).dimmed())?;

        let max = self.ranked.iter().map(|s| s.score).fold(0.0, f64::max);
        for (i, site) in self.ranked.iter().enumerate() {
            let name = if i == 0 {
                site.name.green().bold()
            } else {
                site.name.normal()
            };
            write!(f, "  {:>4}. {:<20} {:>8.4}", i + 1, name, site.score)?;
            if self.chart {
                write!(f, "  {}", bar(site.score, max, BAR_WIDTH).cyan())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Gravity model scores in candidate order, best marked.
pub struct GravityReport<'a> {
    scores: &'a [GravityScore],
}

pub fn render_gravity(scores: &[GravityScore]) -> GravityReport<'_> {
    GravityReport { scores }
}

impl fmt::Display for GravityReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "=== Gravity model ===".bold())?;
        writeln!(
            f,
            "  {:<12} {:>14} {:>14} {:>14}",
            "Site".dimmed(),
            "Attractiveness".dimmed(),
            "Decay".dimmed(),
            "Score".dimmed()
        )?;
        let best = self
            .scores
            .iter()
            .map(|s| s.score)
            .fold(f64::NEG_INFINITY, f64::max);
        for s in self.scores {
            let marker = if s.score == best {
                "*".green().bold()
            } else {
                " ".normal()
            };
            writeln!(
                f,
                "{} {:<12} {:>14.4} {:>14.6} {:>14.6}",
                marker, s.name, s.attractiveness, s.decay, s.score
            )?;
        }
        Ok(())
    }
}

/// Outcome of a selection model solve.
pub struct SelectionReport<'a> {
    model: &'a SelectionModel,
    solution: &'a SelectionSolution,
}

pub fn render_selection<'a>(
    model: &'a SelectionModel,
    solution: &'a SelectionSolution,
) -> SelectionReport<'a> {
    SelectionReport { model, solution }
}

impl fmt::Display for SelectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solution = self.solution;
        writeln!(f, "\n{}", format!("=== Selection: {} ===", self.model.name).bold())?;
        match solution.status {
            SolverStatus::Optimal => {}
            SolverStatus::Infeasible => {
                writeln!(f, "  {}", "No feasible site selected.".red().bold())?;
            }
            SolverStatus::Timeout if solution.is_solution_found() => {
                writeln!(f, "  {}", "Limit reached, best selection so far:".yellow())?;
            }
            status => writeln!(f, "  {} {:?}", "Solver stopped:".yellow(), status)?,
        }
        if solution.is_solution_found() {
            writeln!(f, "  Status: {}", format!("{:?}", solution.status).green())?;
            writeln!(f, "  Selected sites: {}", solution.selected.join(", ").bold())?;
            if let Some(value) = solution.objective_value {
                writeln!(f, "  Objective value: {value:.4}")?;
            }
        }
        let stats = format!("{} nodes, {} ms", solution.nodes, solution.solve_time_ms);
        writeln!(f, "  {}", stats.dimmed())
    }
}

/// Aggregated Pareto portfolio rows.
pub struct PortfolioReport<'a> {
    rows: &'a [PortfolioRow],
}

pub fn render_portfolio(rows: &[PortfolioRow]) -> PortfolioReport<'_> {
    PortfolioReport { rows }
}

impl fmt::Display for PortfolioReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No eligible portfolio found.");
        }
        let title = format!("=== Pareto portfolios ({} rows) ===", self.rows.len());
        writeln!(f, "\n{}", title.bold())?;
        writeln!(
            f,
            "  {:>4}  {:<28} {:<16} {:>5} {:>4} {:>4} {:>4} {:>8}",
            "Sol".dimmed(),
            "Location".dimmed(),
            "City".dimmed(),
            "PUE".dimmed(),
            "IXP".dimmed(),
            "Svc".dimmed(),
            "Age".dimmed(),
            "Score".dimmed()
        )?;
        for row in self.rows {
            let score = row
                .weighted_score
                .map(|s| format!("{s:>8.4}"))
                .unwrap_or_else(|| format!("{:>8}", "-"));
            writeln!(
                f,
                "  {:>4}  {:<28} {:<16} {:>5.2} {:>4} {:>4} {:>4} {}",
                row.solution,
                truncate(&row.location, 28),
                truncate(&row.city, 16),
                row.pue,
                row.ixp_count,
                row.service_score,
                row.facility_age,
                score
            )?;
        }
        Ok(())
    }
}

/// Cluster membership of named rows.
pub struct ClusterReport<'a> {
    names: &'a [String],
    labels: &'a [usize],
    inertia: f64,
}

pub fn render_clusters<'a>(
    names: &'a [String],
    labels: &'a [usize],
    inertia: f64,
) -> ClusterReport<'a> {
    ClusterReport {
        names,
        labels,
        inertia,
    }
}

impl fmt::Display for ClusterReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = self.labels.iter().max().map_or(0, |m| m + 1);
        writeln!(f, "\n{}", format!("=== K-means ({k} clusters) ===").bold())?;
        for cluster in 0..k {
            let members: Vec<&str> = self
                .names
                .iter()
                .zip(self.labels)
                .filter(|(_, &l)| l == cluster)
                .map(|(n, _)| n.as_str())
                .collect();
            let heading = format!("Cluster {cluster}:");
            writeln!(f, "  {} {}", heading.cyan().bold(), members.join(", "))?;
        }
        writeln!(f, "  {}", format!("inertia {:.4}", self.inertia).dimmed())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(1.0, 1.0, 10).chars().count(), 10);
        assert_eq!(bar(0.5, 1.0, 10).chars().count(), 5);
        assert_eq!(bar(2.0, 1.0, 4).chars().count(), 4);
        assert!(bar(0.0, 1.0, 10).is_empty());
        assert!(bar(1.0, 0.0, 10).is_empty());
        assert!(bar(1.0, f64::NAN, 10).is_empty());
        assert!(bar(1.0, -2.0, 10).is_empty());
        assert!(bar(f64::NAN, 1.0, 10).is_empty());
    }

    #[test]
    fn test_render_scores() {
        let ranked = vec![
            ScoredSite { name: "Mumbai".into(), score: 0.8, normalized: vec![] },
            ScoredSite { name: "Nagpur".into(), score: 0.4, normalized: vec![] },
        ];
        let text = render_scores(&ranked, true).to_string();
        assert!(text.contains("Mumbai"));
        assert!(text.contains("0.4000"));
        assert!(text.contains(&"█".repeat(20)));
    }

    #[test]
    fn test_render_infeasible_selection() {
        let model = SelectionModel::new("capacity");
        let solution = SelectionSolution::empty(SolverStatus::Infeasible);
        let text = render_selection(&model, &solution).to_string();
        assert!(text.contains("No feasible site selected."));
        assert!(!text.contains("Selected sites"));
    }

    #[test]
    fn test_render_timeout_with_incumbent() {
        use crate::select::{BinaryVar, BranchAndBoundSolver, SelectionSolver, SolverConfig};

        let mut model = SelectionModel::new("capacity");
        for name in ["Pune", "Chennai", "Nagpur"] {
            model.add_var(BinaryVar::new(name));
        }
        model.add_at_most("one", 1);
        let config = SolverConfig {
            node_limit: Some(4),
            ..SolverConfig::default()
        };
        let solution = BranchAndBoundSolver::new().solve(&model, &config);
        assert_eq!(solution.status, SolverStatus::Timeout);

        let text = render_selection(&model, &solution).to_string();
        assert!(text.contains("best selection so far"));
        assert!(text.contains("Selected sites"));
    }

    #[test]
    fn test_render_empty_portfolio() {
        assert_eq!(render_portfolio(&[]).to_string(), "No eligible portfolio found.\n");
    }

    #[test]
    fn test_render_clusters() {
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let text = render_clusters(&names, &[0, 1, 0], 1.5).to_string();
        assert!(text.contains("A, C"));
        assert!(text.contains("2 clusters"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long location name", 6).chars().count(), 6);
    }
}
