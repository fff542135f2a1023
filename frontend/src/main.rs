use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod bootstrap;
mod config;
mod dom;
mod error;
mod enhance {
    pub mod anchors;
    pub mod frame;
    pub mod lazy;
    pub mod mobile_nav;
    pub mod scroll;
    pub mod visibility;
}
mod widgets {
    pub mod accordion;
    pub mod back_to_top;
    pub mod consent;
    pub mod countdown;
    pub mod outbound;
    pub mod pricing;
    pub mod slider;
}
mod pages {
    pub mod landing;
    pub mod privacy;
}

use pages::{landing::Landing, privacy::PrivacyPolicy};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/privacy")]
    Privacy,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering landing page");
            html! { <Landing /> }
        }
        Route::Privacy => {
            info!("Rendering privacy page");
            html! { <PrivacyPolicy /> }
        }
        Route::NotFound => html! {
            <div class="not-found">
                <h1>{"Page not found"}</h1>
                <Link<Route> to={Route::Home}>{"Back to the offer"}</Link<Route>>
            </div>
        },
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page");
    yew::Renderer::<App>::new().render();
}
