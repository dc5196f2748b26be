use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = Path::new("data");

    println!("Loading Steam snapshot...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)
        .expect("Failed to load snapshot");
    let elapsed = start.elapsed();

    let (games, reviews, library) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Games: {}", games);
    println!("Reviews: {}", reviews);
    println!("Library entries: {}", library);
    println!("\nPerformance: {:.0} records/second",
             (games + reviews + library) as f64 / elapsed.as_secs_f64());
}
