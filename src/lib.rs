//! Time/cost trade-off charts for the resource allocation experiments.
//!
//! The crate root is a small binding to the [Matplotlib][] Python
//! visualization library, close to its explicit "figure and axes"
//! interface while keeping a Rust flavor.  The [`experiment`] module
//! holds the measured sweeps and [`report`] turns one sweep into a
//! two-panel figure.
//!
//! Usage
//! -----
//!
//! ```no_run
//! use tradeoff_plots as plt;
//! let (fig, [mut ax]) = plt::subplots_row((6., 4.))?;
//! ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).marker("x").plot()?;
//! fig.save().to_file("target/basic.svg")?;
//! # Ok::<(), tradeoff_plots::Error>(())
//! ```
//!
//! [Matplotlib]: https://matplotlib.org/

use std::{
    fmt::{Display, Formatter},
    path::Path,
};
use lazy_static::lazy_static;
use pyo3::{
    prelude::*,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};
use numpy::PyArray1;

pub mod experiment;
pub mod report;

/// Possible errors of the plotting functions.
#[derive(Debug)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    FileNotFoundError,
    /// Permission denied to access or create the filesystem path.
    PermissionError,
    /// A sequence handed over for plotting does not have the length
    /// of the values it is paired with.
    ShapeMismatch { series: &'static str, expected: usize, found: usize },
    /// Other Python errors.
    Python(PyErr),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::NoMatplotlib =>
                write!(f, "The matplotlib library has not been found.\n\
Please install it.  See https://matplotlib.org/\n\
If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554"),
            Error::FileNotFoundError =>
                write!(f, "A path contains an element that is not a \
                           directory or does not exist"),
            Error::PermissionError =>
                write!(f, "Permission denied to access or create the \
                           filesystem path"),
            Error::ShapeMismatch { series, expected, found } =>
                write!(f, "Shape mismatch: expected {} {} values, \
                           found {}", expected, series, found),
            Error::Python(e) =>
                write!(f, "Python error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<PyErr> for Error {
    fn from(e: PyErr) -> Self {
        Error::Python(e)
    }
}

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import_bound(py, $m).map(|m| m.unbind()))
}}

lazy_static! {
    static ref PYPLOT: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.pyplot")
    };
    static ref TICKER: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.ticker")
    };
}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: ident) => {
    $m.as_ref().map_err(|_| Error::NoMatplotlib)
}}

/// Copy `x` into a fresh numpy array.  Matplotlib keeps a reference
/// to the plotted arrays, so they must not borrow Rust memory.
fn to_numpy<'py>(py: Python<'py>, x: &[f64]) -> Bound<'py, PyArray1<f64>> {
    PyArray1::from_slice_bound(py, x)
}

/// One subplot of a [`Figure`].
#[derive(Debug, Clone)]
pub struct Axes {
    ax: PyObject,
}

/// The top level container for all the plot elements.
#[derive(Debug)]
pub struct Figure {
    fig: PyObject, // instance of matplotlib.figure.Figure
}

/// A line drawn on some [`Axes`].
#[derive(Debug, Clone)]
pub struct Line {
    line2d: PyObject, // instance of matplotlib.lines.Line2D
}

/// Return a new figure, registered with pyplot so that [`show`]
/// displays it, of size `w`×`h` inches.
pub fn figure_with_size(w: f64, h: f64) -> Result<Figure, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        let kwargs = PyDict::new_bound(py);
        kwargs.set_item("figsize", (w, h))?;
        let fig = pyplot.bind(py)
            .call_method("figure", (), Some(&kwargs))?;
        Ok(Figure { fig: fig.unbind() })
    })
}

/// Return a new figure with `C` axes arranged horizontally.
pub fn subplots_row<const C: usize>(
    (w, h): (f64, f64)) -> Result<(Figure, [Axes; C]), Error> {
    let fig = figure_with_size(w, h)?;
    let axes = fig.subplots_row()?;
    Ok((fig, axes))
}

/// Whether pyplot still holds the figure numbered `num`.
pub fn figure_exists(num: i64) -> Result<bool, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        Ok(pyplot.bind(py).call_method1("fignum_exists", (num,))?.extract()?)
    })
}

/// Display all open figures, blocking until the windows are closed
/// when the backend is interactive.
pub fn show() -> Result<(), Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        pyplot.bind(py).call_method0("show")?;
        Ok(())
    })
}

impl Figure {
    /// Add `C` axes on a single row.
    pub fn subplots_row<const C: usize>(&self) -> Result<[Axes; C], Error> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("squeeze", false)?;
            let axs = self.fig.bind(py)
                .call_method("subplots", (1, C), Some(&kwargs))?
                .call_method0("ravel")?
                .call_method0("tolist")?
                .extract::<Vec<PyObject>>()?;
            let axes: Vec<Axes> = axs.into_iter()
                .map(|ax| Axes { ax })
                .collect();
            axes.try_into().map_err(|axes: Vec<Axes>| Error::ShapeMismatch {
                series: "axes", expected: C, found: axes.len() })
        })
    }

    /// Set a title centered above all the axes of the figure.
    pub fn suptitle(&mut self, title: &str) -> Result<&mut Self, Error> {
        Python::with_gil(|py| {
            self.fig.call_method1(py, "suptitle", (title,))
        })?;
        Ok(self)
    }

    /// Adjust the padding between and around subplots so that axis
    /// labels and titles do not overlap.
    pub fn tight_layout(&mut self) -> Result<&mut Self, Error> {
        Python::with_gil(|py| self.fig.call_method0(py, "tight_layout"))?;
        Ok(self)
    }

    /// Number of axes in the figure.
    pub fn axes_count(&self) -> Result<usize, Error> {
        Python::with_gil(|py| {
            let axes = self.fig.bind(py).call_method0("get_axes")?;
            Ok(axes.len()?)
        })
    }

    /// The text set with [`Figure::suptitle`], if any.
    pub fn suptitle_text(&self) -> Result<Option<String>, Error> {
        Python::with_gil(|py| {
            let t = self.fig.bind(py).getattr("_suptitle")?;
            if t.is_none() {
                Ok(None)
            } else {
                Ok(Some(t.call_method0("get_text")?.extract()?))
            }
        })
    }

    /// The number under which pyplot registered the figure.
    pub fn number(&self) -> Result<i64, Error> {
        Python::with_gil(|py| {
            Ok(self.fig.bind(py).getattr("number")?.extract()?)
        })
    }

    /// Remove the figure from pyplot so that [`show`] no longer
    /// displays it.
    pub fn close(self) -> Result<(), Error> {
        let pyplot = pymod!(PYPLOT)?;
        Python::with_gil(|py| {
            pyplot.bind(py).call_method1("close", (self.fig.clone_ref(py),))?;
            Ok(())
        })
    }

    pub fn save(&self) -> Savefig {
        Savefig { fig: Python::with_gil(|py| self.fig.clone_ref(py)),
                  dpi: None }
    }
}

pub struct Savefig {
    fig: PyObject,
    dpi: Option<f64>,
}

impl Savefig {
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        if dpi > 0. {
            self.dpi = Some(dpi);
        } else {
            self.dpi = None;
        }
        self
    }

    /// Write the figure to `path`.  The format is deduced from the
    /// file extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            if let Some(dpi) = self.dpi {
                kwargs.set_item("dpi", dpi)?;
            }
            self.fig.bind(py).call_method(
                "savefig", (path.as_ref(),), Some(&kwargs)
            ).map_err(|e| {
                if e.is_instance_of::<PyFileNotFoundError>(py) {
                    Error::FileNotFoundError
                } else if e.is_instance_of::<PyPermissionError>(py) {
                    Error::PermissionError
                } else {
                    Error::Python(e)
                }
            })?;
            Ok(())
        })
    }
}


impl Axes {
    /// Plot `y` versus `x` as lines and/or markers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tradeoff_plots as plt;
    /// let (fig, [mut ax]) = plt::subplots_row((6., 4.))?;
    /// ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.])
    ///     .color("black").linestyle("dotted").marker("x")
    ///     .plot()?;
    /// fig.save().to_file("target/xy_plot.pdf")?;
    /// # Ok::<(), tradeoff_plots::Error>(())
    /// ```
    #[must_use]
    pub fn xy<'a>(&'a mut self, x: &'a [f64], y: &'a [f64]) -> XY<'a> {
        // `self` is mutably borrowed to reflect that the final
        // `.plot()` mutates the underlying Python object.
        XY { axes: self, options: PlotOptions::new(), x, y }
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        Python::with_gil(|py| self.ax.call_method1(py, "set_xlabel", (label,)))?;
        Ok(self)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        Python::with_gil(|py| self.ax.call_method1(py, "set_ylabel", (label,)))?;
        Ok(self)
    }

    /// Force scientific notation on the y tick labels: every tick
    /// shares one power of ten, shown once as a superscript
    /// multiplier above the axis.
    pub fn sci_yaxis(&mut self) -> Result<&mut Self, Error> {
        let ticker = pymod!(TICKER)?;
        Python::with_gil(|py| -> PyResult<()> {
            let ax = self.ax.bind(py);
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("useMathText", true)?;
            let formatter = ticker.bind(py)
                .getattr("ScalarFormatter")?
                .call((), Some(&kwargs))?;
            ax.getattr("yaxis")?
                .call_method1("set_major_formatter", (formatter,))?;
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("axis", "y")?;
            kwargs.set_item("style", "sci")?;
            kwargs.set_item("scilimits", (0, 0))?;
            ax.call_method("ticklabel_format", (), Some(&kwargs))?;
            Ok(())
        })?;
        Ok(self)
    }

    pub fn xlabel(&self) -> Result<String, Error> {
        Python::with_gil(|py| {
            Ok(self.ax.call_method0(py, "get_xlabel")?.extract(py)?)
        })
    }

    pub fn ylabel(&self) -> Result<String, Error> {
        Python::with_gil(|py| {
            Ok(self.ax.call_method0(py, "get_ylabel")?.extract(py)?)
        })
    }

    /// The lines drawn on these axes, in drawing order.
    pub fn lines(&self) -> Result<Vec<Line>, Error> {
        Python::with_gil(|py| {
            let lines = self.ax.bind(py)
                .call_method0("get_lines")?
                .extract::<Vec<PyObject>>()?;
            Ok(lines.into_iter().map(|line2d| Line { line2d }).collect())
        })
    }

    /// Whether the y tick labels use a math-text scalar formatter
    /// whose exponent is always collapsed to a single power of ten.
    pub fn y_uses_sci_notation(&self) -> Result<bool, Error> {
        Python::with_gil(|py| {
            let formatter = self.ax.bind(py)
                .getattr("yaxis")?
                .call_method0("get_major_formatter")?;
            if !formatter.hasattr("get_useMathText")? {
                return Ok(false)
            }
            let math: bool = formatter.call_method0("get_useMathText")?
                .extract()?;
            if !math {
                return Ok(false)
            }
            // A list when taken from rcParams, a tuple once set by
            // `ticklabel_format`.
            let limits: Vec<i32> = formatter.getattr("_powerlimits")?
                .extract()?;
            Ok(limits == [0, 0])
        })
    }
}

impl Line {
    fn data(&self, getter: &str) -> Result<Vec<f64>, Error> {
        Python::with_gil(|py| {
            Ok(self.line2d.bind(py)
               .call_method0(getter)?
               .call_method0("tolist")?
               .extract()?)
        })
    }

    pub fn xdata(&self) -> Result<Vec<f64>, Error> {
        self.data("get_xdata")
    }

    pub fn ydata(&self) -> Result<Vec<f64>, Error> {
        self.data("get_ydata")
    }
}

#[derive(Clone)]
struct PlotOptions<'a> {
    color: Option<&'a str>,
    linestyle: Option<&'a str>,
    marker: Option<&'a str>,
    label: &'a str,
    linewidth: Option<f64>,
}

impl<'a> PlotOptions<'a> {
    fn new() -> PlotOptions<'static> {
        PlotOptions { color: None, linestyle: None, marker: None,
                      label: "", linewidth: None }
    }

    fn kwargs<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let kwargs = PyDict::new_bound(py);
        if let Some(c) = self.color {
            kwargs.set_item("color", c)?
        }
        if let Some(s) = self.linestyle {
            kwargs.set_item("linestyle", s)?
        }
        if let Some(m) = self.marker {
            kwargs.set_item("marker", m)?
        }
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label)?
        }
        if let Some(w) = self.linewidth {
            kwargs.set_item("linewidth", w)?
        }
        Ok(kwargs)
    }
}

/// Options for plotting `y` versus `x`, see [`Axes::xy`].
#[must_use]
pub struct XY<'a> {
    axes: &'a mut Axes,
    options: PlotOptions<'a>,
    x: &'a [f64],
    y: &'a [f64],
}

impl<'a> XY<'a> {
    pub fn color(mut self, color: &'a str) -> Self {
        self.options.color = Some(color);
        self
    }

    /// Matplotlib line style: "solid", "dotted", "dashed",...
    pub fn linestyle(mut self, style: &'a str) -> Self {
        self.options.linestyle = Some(style);
        self
    }

    /// Matplotlib marker: "x", "o", ".",...
    pub fn marker(mut self, marker: &'a str) -> Self {
        self.options.marker = Some(marker);
        self
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }

    pub fn linewidth(mut self, w: f64) -> Self {
        self.options.linewidth = Some(w);
        self
    }

    /// Plot the data with the options specified in [`XY`].  Fail
    /// without touching the axes if `x` and `y` differ in length.
    pub fn plot(self) -> Result<Line, Error> {
        if self.x.len() != self.y.len() {
            return Err(Error::ShapeMismatch {
                series: "y", expected: self.x.len(), found: self.y.len() })
        }
        Python::with_gil(|py| {
            let xn = to_numpy(py, self.x);
            let yn = to_numpy(py, self.y);
            let kwargs = self.options.kwargs(py)?;
            let lines = self.axes.ax.bind(py)
                .call_method("plot", (xn, yn), Some(&kwargs))?;
            let line2d = lines.get_item(0)?.unbind();
            Ok(Line { line2d })
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "needs matplotlib"]
    fn a_basic_row() -> Result<(), Error> {
        let (fig, [mut ax0, mut ax1]) = subplots_row((10., 5.))?;
        ax0.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.])
            .label("measured").linewidth(0.5).plot()?;
        ax1.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.])
            .color("black").linestyle("dotted").marker("x").plot()?;
        assert_eq!(fig.axes_count()?, 2);
        fig.save().to_file("target/a_basic_row.svg")?;
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn plotted_data_is_copied() -> Result<(), Error> {
        let (fig, [mut ax]) = subplots_row((4., 3.))?;
        {
            let x = vec![1., 2., 3.];
            let y = vec![3078., 4796., 5975.];
            ax.xy(&x, &y).plot()?;
        }
        let lines = ax.lines()?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].xdata()?, vec![1., 2., 3.]);
        assert_eq!(lines[0].ydata()?, vec![3078., 4796., 5975.]);
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn mismatched_lengths_are_refused() -> Result<(), Error> {
        let (fig, [mut ax]) = subplots_row((4., 3.))?;
        let r = ax.xy(&[1., 2., 3.], &[1., 2.]).plot();
        assert!(matches!(r, Err(Error::ShapeMismatch { expected: 3, found: 2, .. })));
        assert!(ax.lines()?.is_empty());
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn default_formatter_is_not_sci() -> Result<(), Error> {
        let (fig, [mut ax]) = subplots_row((4., 3.))?;
        assert!(!ax.y_uses_sci_notation()?);
        ax.xy(&[1., 2.], &[3078., 4796.]).plot()?;
        assert!(!ax.y_uses_sci_notation()?);
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn sci_notation_and_titles() -> Result<(), Error> {
        let (mut fig, [mut ax]) = subplots_row((4., 3.))?;
        assert!(!ax.y_uses_sci_notation()?);
        ax.xy(&[1., 2.], &[173855., 141280.]).plot()?;
        ax.set_xlabel("Max Time")?.set_ylabel("Actual Cost")?.sci_yaxis()?;
        assert!(ax.y_uses_sci_notation()?);
        assert_eq!(ax.xlabel()?, "Max Time");
        assert_eq!(ax.ylabel()?, "Actual Cost");
        assert_eq!(fig.suptitle_text()?, None);
        fig.suptitle("Max Cost = 60,000")?.tight_layout()?;
        assert_eq!(fig.suptitle_text()?.as_deref(), Some("Max Cost = 60,000"));
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn save_into_missing_directory() -> Result<(), Error> {
        let (fig, [_ax]) = subplots_row((4., 3.))?;
        let r = fig.save().to_file("target/no/such/dir/plot.svg");
        assert!(matches!(r, Err(Error::FileNotFoundError)));
        fig.close()
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn closed_figure_is_forgotten() -> Result<(), Error> {
        let (fig, [_ax]) = subplots_row((4., 3.))?;
        let num = fig.number()?;
        assert!(figure_exists(num)?);
        fig.close()?;
        assert!(!figure_exists(num)?);
        Ok(())
    }
}
