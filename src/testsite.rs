//! A stand-in for the traffic police site, served on an ephemeral port.

use crate::error::OcrError;
use crate::ocr::Ocr;
use futures::future::{self, BoxFuture, FutureExt};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use warp::Filter;

pub struct Submission {
    pub query: String,
    pub form: HashMap<String, String>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

pub struct ResultQuery {
    pub query: HashMap<String, String>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Default)]
struct Recorded {
    captcha_fetches: usize,
    captcha_user_agents: Vec<Option<String>>,
    sessions: u32,
    submissions: Vec<Submission>,
    results: Vec<ResultQuery>,
}

pub struct TestSite {
    addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
    server: JoinHandle<()>,
}

impl TestSite {
    /// `form_responses[n]` answers the n-th submission; the last entry repeats.
    pub async fn start(form_responses: Vec<&'static str>, results_html: &str) -> TestSite {
        TestSite::with_captcha(form_responses, results_html, captcha_png()).await
    }

    pub async fn with_captcha(
        form_responses: Vec<&'static str>,
        results_html: &str,
        captcha: Vec<u8>,
    ) -> TestSite {
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let state = recorded.clone();
        let captcha_route = warp::get()
            .and(warp::path!("lib" / "captcha" / "captcha.class.php"))
            .and(warp::header::optional::<String>("cookie"))
            .and(warp::header::optional::<String>("user-agent"))
            .map(move |cookie: Option<String>, user_agent: Option<String>| {
                let mut recorded = state.lock().unwrap();
                recorded.captcha_fetches += 1;
                recorded.captcha_user_agents.push(user_agent);
                let mut response =
                    warp::http::Response::builder().header("content-type", "image/png");
                if cookie.is_none() {
                    recorded.sessions += 1;
                    response = response.header(
                        "set-cookie",
                        format!("PHPSESSID=session-{}; Path=/", recorded.sessions),
                    );
                }
                response.body(captcha.clone()).unwrap()
            });

        let state = recorded.clone();
        let form_route = warp::post()
            .and(warp::path::end())
            .and(warp::query::raw())
            .and(warp::header::optional::<String>("cookie"))
            .and(warp::header::optional::<String>("user-agent"))
            .and(warp::body::form::<HashMap<String, String>>())
            .map(move |query: String, cookie: Option<String>, user_agent, form| {
                let mut recorded = state.lock().unwrap();
                let n = recorded.submissions.len().min(form_responses.len() - 1);
                recorded.submissions.push(Submission {
                    query,
                    form,
                    cookie,
                    user_agent,
                });
                form_responses[n].to_string()
            });

        let state = recorded.clone();
        let results_html = results_html.to_string();
        let results_route = warp::get()
            .and(warp::path!("tra-cuu-phuong-tien-vi-pham.html"))
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::optional::<String>("cookie"))
            .and(warp::header::optional::<String>("user-agent"))
            .map(move |query, cookie, user_agent| {
                state.lock().unwrap().results.push(ResultQuery {
                    query,
                    cookie,
                    user_agent,
                });
                warp::reply::html(results_html.clone())
            });

        let routes = captcha_route.or(form_route).or(results_route);
        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        TestSite {
            addr,
            recorded,
            server: tokio::spawn(server),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn captcha_fetches(&self) -> usize {
        self.recorded.lock().unwrap().captcha_fetches
    }

    pub fn captcha_user_agents(&self) -> Vec<Option<String>> {
        self.recorded.lock().unwrap().captcha_user_agents.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.recorded
            .lock()
            .unwrap()
            .submissions
            .iter()
            .map(|s| Submission {
                query: s.query.clone(),
                form: s.form.clone(),
                cookie: s.cookie.clone(),
                user_agent: s.user_agent.clone(),
            })
            .collect()
    }

    pub fn result_queries(&self) -> Vec<ResultQuery> {
        self.recorded
            .lock()
            .unwrap()
            .results
            .iter()
            .map(|r| ResultQuery {
                query: r.query.clone(),
                cookie: r.cookie.clone(),
                user_agent: r.user_agent.clone(),
            })
            .collect()
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn captcha_png() -> Vec<u8> {
    let image = RgbImage::from_fn(40, 16, |x, y| {
        if (x + y) % 3 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut png = vec![];
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}

/// OCR stand-in returning a fixed answer.
pub struct FakeOcr {
    answer: Option<String>,
}

impl FakeOcr {
    pub fn text(text: &str) -> FakeOcr {
        FakeOcr {
            answer: Some(text.to_string()),
        }
    }

    pub fn failing() -> FakeOcr {
        FakeOcr { answer: None }
    }
}

impl Ocr for FakeOcr {
    fn recognize<'a>(&'a self, _image: &'a DynamicImage) -> BoxFuture<'a, Result<String, OcrError>> {
        let result = match &self.answer {
            Some(text) => Ok(text.clone()),
            None => Err(OcrError::Engine {
                status: "exit status: 1".to_string(),
                stderr: "Error during processing.".to_string(),
            }),
        };
        future::ready(result).boxed()
    }
}
