//! Two-panel charts of an [`Experiment`]: actual time on the left,
//! actual cost on the right, both against the swept parameter.
//!
//! Charting happens in two steps.  [`layout`] decides what goes on
//! each panel without touching Python; [`Report::draw`] realizes a
//! layout on a new Matplotlib figure.

use std::path::PathBuf;
use tracing::{debug, info};
use crate::{
    experiment::{order_of_magnitude, Experiment, Sweep},
    Axes, Error, Figure,
};

/// How the measurements are drawn on each panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub linestyle: &'static str,
    pub marker: &'static str,
}

impl Default for LineStyle {
    /// Black dotted line through "x" markers.
    fn default() -> Self {
        LineStyle { color: "black", linestyle: "dotted", marker: "x" }
    }
}

/// Content of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout<'a> {
    pub x_label: &'a str,
    pub y_label: &'static str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// Tick labels of the y-axis share one power of ten.
    pub sci_y: bool,
}

/// Content of a whole figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout<'a> {
    pub title: &'a str,
    pub panels: [PanelLayout<'a>; 2],
}

/// Lay out `experiment` on two panels labelled with the swept
/// `parameter`, under the figure title `caption`.
pub fn layout<'a>(experiment: &'a Experiment, parameter: &'a str,
                  caption: &'a str) -> FigureLayout<'a> {
    let panel = |y_label, y| PanelLayout {
        x_label: parameter, y_label, x: experiment.independent(), y,
        sci_y: true };
    FigureLayout {
        title: caption,
        panels: [panel("Actual Time", experiment.actual_time()),
                 panel("Actual Cost", experiment.actual_cost())],
    }
}

/// Where rendered figures go.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Display with the active Matplotlib backend, blocking until the
    /// window is closed.
    Show,
    /// Write `<dir>/<slug>.<format>`.
    Save { dir: PathBuf, format: String, dpi: Option<f64> },
}

impl Output {
    /// File written for a figure named `slug`, if any.
    pub fn path(&self, slug: &str) -> Option<PathBuf> {
        match self {
            Output::Show => None,
            Output::Save { dir, format, .. } =>
                Some(dir.join(format!("{}.{}", slug, format))),
        }
    }
}

/// Renders experiments as two-panel figures.
#[derive(Debug, Clone)]
pub struct Report {
    style: LineStyle,
    size: (f64, f64), // inches
}

impl Default for Report {
    fn default() -> Self {
        Report { style: LineStyle::default(), size: (10., 5.) }
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Figure size in inches.
    pub fn size(mut self, w: f64, h: f64) -> Self {
        self.size = (w, h);
        self
    }

    /// Draw `layout` on a new figure and return it with its two axes.
    pub fn draw(&self, layout: &FigureLayout<'_>)
                -> Result<(Figure, [Axes; 2]), Error> {
        let (mut fig, mut axes) = crate::subplots_row(self.size)?;
        for (ax, panel) in axes.iter_mut().zip(&layout.panels) {
            ax.xy(panel.x, panel.y)
                .color(self.style.color)
                .linestyle(self.style.linestyle)
                .marker(self.style.marker)
                .plot()?;
            ax.set_ylabel(panel.y_label)?.set_xlabel(panel.x_label)?;
            if panel.sci_y {
                ax.sci_yaxis()?;
                match order_of_magnitude(panel.y) {
                    Some(e) => debug!("{}: largest value of order 10^{}",
                                      panel.y_label, e),
                    None => debug!("{}: no data to scale", panel.y_label),
                }
            }
        }
        fig.suptitle(layout.title)?.tight_layout()?;
        Ok((fig, axes))
    }

    /// Render `experiment` against the swept `parameter`, titled with
    /// the fixed-parameter `caption`.
    pub fn render(&self, experiment: &Experiment, parameter: &str,
                  caption: &str) -> Result<(Figure, [Axes; 2]), Error> {
        let l = layout(experiment, parameter, caption);
        let r = self.draw(&l)?;
        info!("rendered {} points against {} ({})",
              experiment.len(), parameter, caption);
        Ok(r)
    }

    pub fn render_sweep(&self, sweep: &Sweep)
                        -> Result<(Figure, [Axes; 2]), Error> {
        self.render(&sweep.experiment, sweep.parameter, sweep.caption)
    }

    /// Render `sweep` and hand the figure over to `output`.  Return
    /// the written file, if any.
    pub fn publish(&self, sweep: &Sweep, output: &Output)
                   -> Result<Option<PathBuf>, Error> {
        let (fig, _) = self.render_sweep(sweep)?;
        self.deliver(fig, sweep.slug, output)
    }

    /// Show or save `fig` under the name `slug`.  The figure is
    /// closed afterwards, even when delivery fails.
    pub fn deliver(&self, fig: Figure, slug: &str, output: &Output)
                   -> Result<Option<PathBuf>, Error> {
        let path = output.path(slug);
        let delivered = match (output, &path) {
            (Output::Save { dpi, .. }, Some(path)) => {
                let mut save = fig.save();
                if let Some(dpi) = dpi {
                    save.dpi(*dpi);
                }
                save.to_file(path)
            }
            _ => crate::show(),
        };
        fig.close()?;
        delivered?;
        if let Some(path) = &path {
            info!("saved {}", path.display());
        }
        Ok(path)
    }
}
