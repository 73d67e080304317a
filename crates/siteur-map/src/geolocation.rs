//! Sources of the user's position.
//!
//! Results are reported asynchronously as `LocationFix` /
//! `LocationFailed` actions carrying the generation they were started
//! with, so the reducer can drop answers from a released watch.

use crate::actions::Action;
use crate::services::Inbox;
use serde::Deserialize;
use siteur::LatLng;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("geolocation is not available")]
    Unavailable,
    #[error("location lookup failed: {0}")]
    Request(String),
    #[error("location response had no coordinates")]
    NoCoordinates,
}

pub trait LocationProvider {
    /// Start continuous updates, replacing any active watch.
    fn watch(&mut self, generation: u64);
    /// Release the active watch, if any.
    fn cancel(&mut self);
    /// Request a single fix.
    fn current_position(&mut self, generation: u64);
}

fn report(
    inbox: &Inbox,
    generation: u64,
    initial: bool,
    result: Result<LatLng, LocationError>,
) {
    let action = match result {
        Ok(position) => Action::LocationFix {
            generation,
            position,
            initial,
        },
        Err(e) => Action::LocationFailed {
            generation,
            message: e.to_string(),
        },
    };
    inbox.send(action);
}

/// Body returned by ipapi.co.
#[derive(Deserialize)]
struct IpapiCo {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Body returned by ip-api.com.
#[derive(Deserialize)]
struct IpApiCom {
    lat: Option<f64>,
    lon: Option<f64>,
}

fn parse_ipapi_co(body: &str) -> Result<LatLng, LocationError> {
    let parsed: IpapiCo = serde_json::from_str(body)
        .map_err(|e| LocationError::Request(e.to_string()))?;
    match (parsed.latitude, parsed.longitude) {
        (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
        _ => Err(LocationError::NoCoordinates),
    }
}

fn parse_ip_api_com(body: &str) -> Result<LatLng, LocationError> {
    let parsed: IpApiCom = serde_json::from_str(body)
        .map_err(|e| LocationError::Request(e.to_string()))?;
    match (parsed.lat, parsed.lon) {
        (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
        _ => Err(LocationError::NoCoordinates),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::IpLocationProvider;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const PRIMARY_URL: &str = "https://ipapi.co/json/";
    const FALLBACK_URL: &str = "http://ip-api.com/json/";
    const SLEEP_STEP: Duration = Duration::from_millis(250);

    fn fetch(
        client: &reqwest::blocking::Client,
        url: &str,
    ) -> Result<String, LocationError> {
        client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| LocationError::Request(e.to_string()))
    }

    /// One IP-based lookup, falling back to a second service.
    fn lookup(client: &reqwest::blocking::Client) -> Result<LatLng, LocationError> {
        match fetch(client, PRIMARY_URL).and_then(|b| parse_ipapi_co(&b)) {
            Ok(position) => Ok(position),
            Err(e) => {
                log::debug!("{}: {}; trying fallback", PRIMARY_URL, e);
                fetch(client, FALLBACK_URL).and_then(|b| parse_ip_api_com(&b))
            }
        }
    }

    /// Approximate position from the public IP address, polled on a
    /// background thread. Desktop platforms expose no common GPS API.
    pub struct IpLocationProvider {
        inbox: Inbox,
        client: reqwest::blocking::Client,
        poll_interval: Duration,
        cancel_flag: Option<Arc<AtomicBool>>,
    }

    impl IpLocationProvider {
        pub fn new(inbox: Inbox, poll_interval: Duration) -> Self {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|e| {
                    log::warn!("http client setup failed: {}", e);
                    reqwest::blocking::Client::new()
                });
            Self {
                inbox,
                client,
                poll_interval,
                cancel_flag: None,
            }
        }
    }

    impl LocationProvider for IpLocationProvider {
        fn watch(&mut self, generation: u64) {
            self.cancel();
            let cancelled = Arc::new(AtomicBool::new(false));
            self.cancel_flag = Some(cancelled.clone());

            let inbox = self.inbox.clone();
            let client = self.client.clone();
            let interval = self.poll_interval;
            std::thread::spawn(move || {
                'watch: loop {
                    let mut waited = Duration::ZERO;
                    while waited < interval {
                        if cancelled.load(Ordering::Relaxed) {
                            break 'watch;
                        }
                        std::thread::sleep(SLEEP_STEP);
                        waited += SLEEP_STEP;
                    }
                    let result = lookup(&client);
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    report(&inbox, generation, false, result);
                }
                log::debug!("location watch {} stopped", generation);
            });
        }

        fn cancel(&mut self) {
            if let Some(flag) = self.cancel_flag.take() {
                flag.store(true, Ordering::Relaxed);
            }
        }

        fn current_position(&mut self, generation: u64) {
            let inbox = self.inbox.clone();
            let client = self.client.clone();
            std::thread::spawn(move || {
                report(&inbox, generation, true, lookup(&client));
            });
        }
    }

    impl Drop for IpLocationProvider {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::BrowserLocationProvider;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;
    use web_sys::{
        Geolocation, GeolocationPosition, GeolocationPositionError,
        PositionOptions,
    };

    type FixCallback = Closure<dyn FnMut(GeolocationPosition)>;
    type ErrorCallback = Closure<dyn FnMut(GeolocationPositionError)>;

    fn geolocation() -> Result<Geolocation, LocationError> {
        web_sys::window()
            .ok_or(LocationError::Unavailable)?
            .navigator()
            .geolocation()
            .map_err(|_| LocationError::Unavailable)
    }

    fn high_accuracy() -> PositionOptions {
        let options = PositionOptions::new();
        options.set_enable_high_accuracy(true);
        options
    }

    fn callbacks(
        inbox: &Inbox,
        generation: u64,
        initial: bool,
    ) -> (FixCallback, ErrorCallback) {
        let on_fix_inbox = inbox.clone();
        let on_fix: FixCallback = Closure::new(move |position: GeolocationPosition| {
            let coords = position.coords();
            report(
                &on_fix_inbox,
                generation,
                initial,
                Ok(LatLng::new(coords.latitude(), coords.longitude())),
            );
        });
        let on_error_inbox = inbox.clone();
        let on_error: ErrorCallback = Closure::new(move |error: GeolocationPositionError| {
            report(
                &on_error_inbox,
                generation,
                initial,
                Err(LocationError::Request(error.message())),
            );
        });
        (on_fix, on_error)
    }

    struct ActiveWatch {
        id: i32,
        _callbacks: (FixCallback, ErrorCallback),
    }

    /// Browser Geolocation API.
    pub struct BrowserLocationProvider {
        inbox: Inbox,
        watch: Option<ActiveWatch>,
        one_shot: Option<(FixCallback, ErrorCallback)>,
    }

    impl BrowserLocationProvider {
        pub fn new(inbox: Inbox) -> Self {
            Self {
                inbox,
                watch: None,
                one_shot: None,
            }
        }
    }

    impl LocationProvider for BrowserLocationProvider {
        fn watch(&mut self, generation: u64) {
            self.cancel();
            let geo = match geolocation() {
                Ok(geo) => geo,
                Err(e) => return report(&self.inbox, generation, false, Err(e)),
            };
            let (on_fix, on_error) = callbacks(&self.inbox, generation, false);
            match geo.watch_position_with_error_callback_and_options(
                on_fix.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &high_accuracy(),
            ) {
                Ok(id) => {
                    self.watch = Some(ActiveWatch {
                        id,
                        _callbacks: (on_fix, on_error),
                    });
                }
                Err(_) => {
                    report(
                        &self.inbox,
                        generation,
                        false,
                        Err(LocationError::Unavailable),
                    );
                }
            }
        }

        fn cancel(&mut self) {
            if let Some(watch) = self.watch.take()
                && let Ok(geo) = geolocation()
            {
                geo.clear_watch(watch.id);
            }
        }

        fn current_position(&mut self, generation: u64) {
            let geo = match geolocation() {
                Ok(geo) => geo,
                Err(e) => return report(&self.inbox, generation, true, Err(e)),
            };
            let (on_fix, on_error) = callbacks(&self.inbox, generation, true);
            if geo
                .get_current_position_with_error_callback_and_options(
                    on_fix.as_ref().unchecked_ref(),
                    Some(on_error.as_ref().unchecked_ref()),
                    &high_accuracy(),
                )
                .is_err()
            {
                report(
                    &self.inbox,
                    generation,
                    true,
                    Err(LocationError::Unavailable),
                );
            }
            self.one_shot = Some((on_fix, on_error));
        }
    }
}
