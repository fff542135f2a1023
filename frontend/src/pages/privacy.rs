use yew::prelude::*;
use yew_router::components::Link;

use crate::Route;

#[function_component(PrivacyPolicy)]
pub fn privacy_policy() -> Html {
    html! {
        <div class="legal-page">
            <header class="legal-header">
                <Link<Route> to={Route::Home} classes="nav-logo">{"RQG Stream"}</Link<Route>>
            </header>
            <main class="legal-content">
                <h1>{"Privacy Notice"}</h1>
                <p>{"This page does not create accounts and stores nothing in your browser beyond the current visit."}</p>
                <h2>{"Campaign parameters"}</h2>
                <p>
                    {"If you arrived from an advert, the tracking parameters in the address bar (such as utm_source or gclid) \
                      are passed on to our store when you follow a purchase link, so the store can credit the campaign."}
                </p>
                <h2>{"Cookies"}</h2>
                <p>{"Accepting the cookie banner only hides it for this visit. Cookies set by the store are covered by the store's own policy."}</p>
                <h2>{"Contact"}</h2>
                <p>{"Questions about this notice can be sent through the contact form on the store."}</p>
            </main>
        </div>
    }
}
