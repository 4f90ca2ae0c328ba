use std::io::{self, Write};

/// Render one centroid as comma-separated values with four decimal digits.
pub fn format_centroid(centroid: &[f64]) -> String {
    centroid
        .iter()
        .map(|x| format!("{x:.4}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// One line per centroid, in cluster order, each terminated by a newline.
pub fn format_centroids(centroids: &[Vec<f64>]) -> String {
    centroids
        .iter()
        .map(|c| format_centroid(c) + "\n")
        .collect()
}

pub fn write_centroids(w: &mut impl Write, centroids: &[Vec<f64>]) -> io::Result<()> {
    for centroid in centroids {
        writeln!(w, "{}", format_centroid(centroid))?;
    }
    Ok(())
}
