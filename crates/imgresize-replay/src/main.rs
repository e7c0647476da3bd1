#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = imgresize_replay::run_from_env() {
        if imgresize_replay::json_errors() {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
