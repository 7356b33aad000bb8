use tradeoff_plots::{
    experiment::Sweep,
    report::{Output, Report},
    Error,
};

#[test]
#[ignore = "needs matplotlib"]
fn max_time_sweep_figure() -> Result<(), Error> {
    let sweep = Sweep::max_time()?;
    let (fig, axes) = Report::new().render_sweep(&sweep)?;
    assert_eq!(fig.axes_count()?, 2);
    assert_eq!(fig.suptitle_text()?.as_deref(), Some("Max Cost = 60,000"));
    for ax in &axes {
        assert!(ax.y_uses_sci_notation()?);
        assert_eq!(ax.xlabel()?, "Max Time");
    }
    assert_eq!(axes[0].ylabel()?, "Actual Time");
    assert_eq!(axes[1].ylabel()?, "Actual Cost");
    fig.close()
}

#[test]
#[ignore = "needs matplotlib"]
fn max_cost_sweep_figure() -> Result<(), Error> {
    let sweep = Sweep::max_cost()?;
    let (fig, [time, cost]) = Report::new().render_sweep(&sweep)?;
    assert_eq!(fig.axes_count()?, 2);
    assert_eq!(fig.suptitle_text()?.as_deref(), Some("Max Time = 6,000"));
    assert_eq!(time.lines()?[0].ydata()?, sweep.experiment.actual_time());
    assert_eq!(cost.lines()?[0].ydata()?, sweep.experiment.actual_cost());
    fig.close()
}

#[test]
#[ignore = "needs matplotlib"]
fn rendering_twice_gives_the_same_figure() -> Result<(), Error> {
    let sweep = Sweep::max_time()?;
    let report = Report::new();
    let (fig1, axes1) = report.render_sweep(&sweep)?;
    let (fig2, axes2) = report.render_sweep(&sweep)?;
    assert_eq!(fig1.suptitle_text()?, fig2.suptitle_text()?);
    for (a, b) in axes1.iter().zip(&axes2) {
        assert_eq!(a.ylabel()?, b.ylabel()?);
        assert_eq!(a.lines()?.len(), b.lines()?.len());
        assert_eq!(a.lines()?[0].xdata()?, b.lines()?[0].xdata()?);
        assert_eq!(a.lines()?[0].ydata()?, b.lines()?[0].ydata()?);
    }
    fig1.close()?;
    fig2.close()
}

#[test]
#[ignore = "needs matplotlib"]
fn both_sweeps_saved() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let output = Output::Save {
        dir: tmp.path().to_path_buf(),
        format: "svg".into(),
        dpi: None,
    };
    let report = Report::new();
    for sweep in Sweep::all()? {
        let path = report.publish(&sweep, &output)?;
        let path = path.expect("saving reports the written file");
        assert_eq!(Some(path.clone()), output.path(sweep.slug));
        assert!(path.is_file());
    }
    Ok(())
}

