#[tokio::main]
async fn main() {
  if let Err(e) = daily_workout_lib::run().await {
    eprintln!("daily-workout failed: {}", e);
    std::process::exit(1);
  }
}
