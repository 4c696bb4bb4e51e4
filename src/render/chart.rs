//! Chart rendering collaborator.
//!
//! The visual field is an opaque chart configuration (Chart.js shaped, as
//! the service generates it). The dispatcher hands it, together with a fresh
//! [`ChartSurface`], to a [`ChartRenderer`]. The default [`TerminalChart`]
//! reads the common `type` / `data.labels` / `data.datasets` subset into a
//! [`Figure`] that the TUI and the one-shot text output draw as bars.

use crate::error::{QueryLensError, Result};
use serde::Serialize;
use serde_json::Value;

/// Draws a chart configuration onto a surface.
pub trait ChartRenderer: Send + Sync {
    /// Interprets `config` and draws the result onto `surface`.
    fn draw(&self, config: &Value, surface: &mut ChartSurface) -> Result<()>;
}

/// Broad chart family, used to pick a terminal widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    /// Any other Chart.js type; drawn as bars.
    Other(String),
}

impl ChartKind {
    fn from_config(name: Option<&str>) -> Self {
        match name.map(str::to_lowercase).as_deref() {
            None | Some("bar") => Self::Bar,
            Some("line") => Self::Line,
            Some("pie") => Self::Pie,
            Some("doughnut") => Self::Doughnut,
            Some("scatter") | Some("bubble") => Self::Scatter,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Returns true if the kind is best shown as a line/point plot.
    pub fn is_xy(&self) -> bool {
        matches!(self, Self::Line | Self::Scatter)
    }
}

/// One dataset of a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// What a [`ChartRenderer`] drew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl Figure {
    /// Largest value across all series (0.0 for an empty figure).
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// A drawing surface scoped to a single visualization section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSurface {
    figure: Option<Figure>,
}

impl ChartSurface {
    /// Creates a new, empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever is on the surface with `figure`.
    pub fn paint(&mut self, figure: Figure) {
        self.figure = Some(figure);
    }

    /// Returns the drawn figure, if any.
    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    /// Returns true if nothing has been drawn yet.
    pub fn is_blank(&self) -> bool {
        self.figure.is_none()
    }
}

/// Chart.js-subset interpreter for terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalChart;

impl TerminalChart {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for TerminalChart {
    fn draw(&self, config: &Value, surface: &mut ChartSurface) -> Result<()> {
        let config = config
            .as_object()
            .ok_or_else(|| QueryLensError::render("chart configuration must be an object"))?;

        let kind = ChartKind::from_config(config.get("type").and_then(Value::as_str));
        let data = config
            .get("data")
            .ok_or_else(|| QueryLensError::render("chart configuration has no data"))?;

        let labels = data
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| labels.iter().map(label_text).collect())
            .unwrap_or_default();

        let datasets = data
            .get("datasets")
            .and_then(Value::as_array)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| QueryLensError::render("chart configuration has no datasets"))?;

        let series = datasets
            .iter()
            .enumerate()
            .map(|(i, dataset)| parse_series(i, dataset))
            .collect::<Result<Vec<_>>>()?;

        let title = config
            .get("options")
            .and_then(|o| o.pointer("/plugins/title/text").or_else(|| o.pointer("/title/text")))
            .map(label_text);

        surface.paint(Figure {
            kind,
            title,
            labels,
            series,
        });
        Ok(())
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts.iter().map(label_text).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

fn parse_series(index: usize, dataset: &Value) -> Result<Series> {
    let label = dataset
        .get("label")
        .map(label_text)
        .unwrap_or_else(|| format!("Series {}", index + 1));

    let points = dataset
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryLensError::render(format!("dataset '{label}' has no data array")))?;

    let values = points
        .iter()
        .map(|point| point_value(point).ok_or_else(|| {
            QueryLensError::render(format!("dataset '{label}' has a non-numeric point: {point}"))
        }))
        .collect::<Result<Vec<_>>>()?;

    Ok(Series { label, values })
}

fn point_value(point: &Value) -> Option<f64> {
    match point {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        // Missing points in Chart.js are null; plot them at zero.
        Value::Null => Some(0.0),
        Value::Object(obj) => obj.get("y").and_then(point_value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn draw(config: Value) -> Result<ChartSurface> {
        let mut surface = ChartSurface::new();
        TerminalChart::new().draw(&config, &mut surface)?;
        Ok(surface)
    }

    #[test]
    fn test_new_surface_is_blank() {
        assert!(ChartSurface::new().is_blank());
    }

    #[test]
    fn test_bar_chart() {
        let surface = draw(json!({
            "type": "bar",
            "data": {
                "labels": ["Jan", "Feb"],
                "datasets": [{"label": "Sales", "data": [10, 12.5]}]
            },
            "options": {"plugins": {"title": {"display": true, "text": "Monthly"}}}
        }))
        .unwrap();

        assert_eq!(
            surface.figure(),
            Some(&Figure {
                kind: ChartKind::Bar,
                title: Some("Monthly".to_string()),
                labels: vec!["Jan".to_string(), "Feb".to_string()],
                series: vec![Series {
                    label: "Sales".to_string(),
                    values: vec![10.0, 12.5]
                }],
            })
        );
    }

    #[test]
    fn test_point_objects_and_strings() {
        let surface = draw(json!({
            "type": "scatter",
            "data": {"datasets": [{"data": [{"x": 1, "y": 2}, "3.5", null]}]}
        }))
        .unwrap();

        let figure = surface.figure().unwrap();
        assert!(figure.kind.is_xy());
        assert_eq!(figure.series[0].label, "Series 1");
        assert_eq!(figure.series[0].values, vec![2.0, 3.5, 0.0]);
        assert_eq!(figure.max_value(), 3.5);
    }

    #[test]
    fn test_unknown_type_is_other() {
        let surface = draw(json!({
            "type": "polarArea",
            "data": {"datasets": [{"data": [1]}]}
        }))
        .unwrap();
        assert_eq!(
            surface.figure().unwrap().kind,
            ChartKind::Other("polararea".to_string())
        );
    }

    #[test]
    fn test_rejects_non_object() {
        let err = draw(json!("a chart please")).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_rejects_missing_datasets() {
        let err = draw(json!({"type": "bar", "data": {"labels": ["a"]}})).unwrap_err();
        assert!(err.to_string().contains("no datasets"));
    }

    #[test]
    fn test_rejects_non_numeric_points() {
        let err = draw(json!({"data": {"datasets": [{"label": "x", "data": [true]}]}}))
            .unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }
}
