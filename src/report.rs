use edgetrace::TraceError;

pub fn report_error(err: &TraceError) {
    match err {
        TraceError::PaletteOverflow { limit } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!(
                "The tracer is meant for flat-colour artwork; reduce the image \
                 to fewer than {limit} colours and try again."
            );
        }
        TraceError::UnsupportedAlpha { .. } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Flatten any soft edges so every pixel is either opaque or transparent.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
