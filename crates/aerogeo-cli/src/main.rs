use argh::FromArgs;
use std::path::{Path, PathBuf};

use aerogeo::{CameraPose, FlatGround, Geolocator};

mod request;
use request::{GeolocationRequest, GeolocationResponse};

#[derive(FromArgs)]
/// Locate pixels on the ground from a camera snapshot
struct Args {
    /// path to the JSON geolocation request
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to write the JSON result, stdout when omitted
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// only write the located ground coordinates
    #[argh(switch)]
    pixel_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let json = run(&args.input, args.pixel_only)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("wrote result to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Read a request file and return the pretty printed JSON result.
fn run(input: &Path, pixel_only: bool) -> Result<String, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(input)?;
    let request: GeolocationRequest = serde_json::from_reader(std::io::BufReader::new(file))?;
    let response = geolocate(request)?;

    let json = if pixel_only {
        serde_json::to_string_pretty(&response.ground)?
    } else {
        serde_json::to_string_pretty(&response)?
    };

    Ok(json)
}

fn geolocate(
    request: GeolocationRequest,
) -> Result<GeolocationResponse, Box<dyn std::error::Error>> {
    let pose = CameraPose::try_from(request.pose)?;
    let ground = FlatGround::new(request.ground_elevation);
    let locator = Geolocator::with_ground(pose, request.reference_pixels, ground)?;

    let mapping = locator.calculate_pixel_to_geo_mapping()?;
    let located = aerogeo::map_location_from_pixel(&mapping.matrix, &request.pixels);
    log::debug!("located {} pixels", located.len());

    Ok(GeolocationResponse::new(mapping, located))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const NADIR_REQUEST: &str = r#"{
        "pose": {
            "origin": [2.0, 4.0, 2.0],
            "direction": [0.0, 0.0, -1.0],
            "orientation_u": [0.0, -2.0, 0.0],
            "orientation_v": [-1.0, 0.0, 0.0],
            "resolution": [20, 10]
        },
        "reference_pixels": [[0, 0], [0, 10], [20, 0], [20, 10]],
        "pixels": [[10, 5], [20, 10]]
    }"#;

    fn write_request(body: &str) -> Result<tempfile::NamedTempFile, Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(body.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_run_full_result() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_request(NADIR_REQUEST)?;

        let json = run(file.path(), false)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["pairs"].as_array().map(|a| a.len()), Some(4));
        assert_eq!(value["pairs"][0]["ground"], serde_json::json!([4.0, 8.0]));
        assert_eq!(value["matrix"].as_array().map(|a| a.len()), Some(3));

        let ground = &value["ground"];
        assert_relative_eq!(ground[0][0].as_f64().unwrap_or(f64::NAN), 2.0, epsilon = 1e-9);
        assert_relative_eq!(ground[0][1].as_f64().unwrap_or(f64::NAN), 4.0, epsilon = 1e-9);
        assert_relative_eq!(ground[1][0].as_f64().unwrap_or(f64::NAN), 0.0, epsilon = 1e-9);
        assert_relative_eq!(ground[1][1].as_f64().unwrap_or(f64::NAN), 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_run_pixel_only() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_request(NADIR_REQUEST)?;

        let json = run(file.path(), true)?;
        let ground: Vec<[Option<f64>; 2]> = serde_json::from_str(&json)?;

        assert_eq!(ground.len(), 2);
        assert_relative_eq!(ground[0][0].unwrap_or(f64::NAN), 2.0, epsilon = 1e-9);
        assert_relative_eq!(ground[0][1].unwrap_or(f64::NAN), 4.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_ground_elevation() -> Result<(), Box<dyn std::error::Error>> {
        let body = NADIR_REQUEST
            .replace("[2.0, 4.0, 2.0]", "[2.0, 4.0, 3.0]")
            .replace("\"pixels\"", "\"ground_elevation\": 1.0, \"pixels\"");
        let file = write_request(&body)?;

        let json = run(file.path(), true)?;
        let ground: Vec<[Option<f64>; 2]> = serde_json::from_str(&json)?;

        assert_relative_eq!(ground[0][0].unwrap_or(f64::NAN), 2.0, epsilon = 1e-9);
        assert_relative_eq!(ground[0][1].unwrap_or(f64::NAN), 4.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_invalid_pose_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let body = NADIR_REQUEST.replace("[-1.0, 0.0, 0.0]", "[0.0, 0.0, 1.0]");
        let file = write_request(&body)?;

        let err = run(file.path(), false).err().map(|e| e.to_string());

        assert!(err.is_some_and(|msg| msg.contains("pose")));
        Ok(())
    }

    #[test]
    fn test_too_few_reference_pixels() -> Result<(), Box<dyn std::error::Error>> {
        let body = NADIR_REQUEST.replace(
            "[[0, 0], [0, 10], [20, 0], [20, 10]]",
            "[[0, 0], [0, 10]]",
        );
        let file = write_request(&body)?;

        assert!(run(file.path(), false).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_input_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        assert!(run(&dir.path().join("missing.json"), false).is_err());
        Ok(())
    }
}
