use std::path::Path;

use log::info;
use plotters::{
    backend::BitMapBackend,
    chart::ChartBuilder,
    drawing::IntoDrawingArea,
    series::LineSeries,
    style::{IntoFont, BLUE, WHITE},
};

use crate::{
    error::{Error, Result},
    record::trailing_means,
};

fn plot_err(e: impl std::fmt::Display) -> Error {
    Error::Plot(e.to_string())
}

/// Render the trailing mean of `rewards` over `window` episodes to a PNG at `path`
pub fn save_trailing_mean(rewards: &[f32], window: usize, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let means = trailing_means(rewards, window);
    let y_max = means.iter().copied().fold(1.0f32, f32::max) * 1.05;
    let x_max = means.len().max(1);

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Mean reward over last {window} episodes"),
            ("sans-serif", 32).into_font(),
        )
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc("Mean reward")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(means.into_iter().enumerate(), &BLUE))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!("saved reward plot to {}", path.display());
    Ok(())
}
