use yew::prelude::*;
use yew_router::components::Link;

use crate::bootstrap::Enhancements;
use crate::Route;

const STORE_URL: &str = "https://rqgstore.com";

struct Plan {
    name: &'static str,
    price: &'static str,
    period: &'static str,
    slug: &'static str,
    featured: bool,
    perks: &'static [&'static str],
}

const PLANS: &[Plan] = &[
    Plan {
        name: "Monthly",
        price: "49",
        period: "SAR / month",
        slug: "monthly",
        featured: false,
        perks: &["20,000+ live channels", "HD & 4K streams", "1 device"],
    },
    Plan {
        name: "Yearly",
        price: "299",
        period: "SAR / year",
        slug: "yearly",
        featured: true,
        perks: &["Everything in Monthly", "VOD library", "2 devices", "Priority support"],
    },
    Plan {
        name: "Family",
        price: "449",
        period: "SAR / year",
        slug: "family",
        featured: false,
        perks: &["Everything in Yearly", "4 devices", "Parental controls"],
    },
];

const FAQ: &[(&str, &str)] = &[
    (
        "Which devices are supported?",
        "Smart TVs, Android boxes, Fire Stick, iOS and Android phones, and any M3U-compatible player.",
    ),
    (
        "How fast is activation?",
        "Your login arrives by email within minutes of payment, day or night.",
    ),
    (
        "Can I try before paying for a year?",
        "Start with the monthly plan and upgrade at any time; the remaining days carry over.",
    ),
    (
        "What if a channel stops working?",
        "Report it from the store's support page and we switch the source, usually within the hour.",
    ),
];

#[function_component(Landing)]
pub fn landing() -> Html {
    // Attach behavior once the markup is in the document; detach on unmount.
    {
        use_effect_with_deps(
            move |_| {
                let enhancements = match Enhancements::install() {
                    Ok(enhancements) => Some(enhancements),
                    Err(e) => {
                        log::warn!("Landing enhancements unavailable: {}", e);
                        None
                    }
                };
                move || drop(enhancements)
            },
            (),
        );
    }

    html! {
        <div class="landing-page">
            <style>{LANDING_CSS}</style>

            <header id="header" class="site-header">
                <div class="nav-content">
                    <a href="#home" class="nav-logo">{"RQG Stream"}</a>
                    <button id="menu-toggle" class="burger-menu" aria-label="Menu" aria-expanded="false" aria-controls="nav-menu">
                        <span></span>
                        <span></span>
                        <span></span>
                    </button>
                    <nav id="nav-menu" class="nav-menu">
                        <a href="#home" class="nav-link active">{"Home"}</a>
                        <a href="#features" class="nav-link">{"Features"}</a>
                        <a href="#pricing" class="nav-link">{"Pricing"}</a>
                        <a href="#faq" class="nav-link">{"FAQ"}</a>
                        <a href="#contact" class="nav-link">{"Contact"}</a>
                    </nav>
                </div>
            </header>

            <section id="home" class="hero">
                <div class="hero-slider">
                    <div class="hero-slide active" style="background-image: url('/assets/hero-football.jpg');">
                        <div class="hero-content">
                            <h1>{"Every match, live"}</h1>
                            <p>{"Saudi Pro League, Premier League and Champions League in one subscription."}</p>
                        </div>
                    </div>
                    <div class="hero-slide" style="background-image: url('/assets/hero-series.jpg');">
                        <div class="hero-content">
                            <h2>{"Series the night they air"}</h2>
                            <p>{"Arabic, Turkish and international series with Arabic subtitles."}</p>
                        </div>
                    </div>
                    <div class="hero-slide" style="background-image: url('/assets/hero-family.jpg');">
                        <div class="hero-content">
                            <h2>{"Something for the whole family"}</h2>
                            <p>{"Kids' channels, documentaries and movies on up to four screens."}</p>
                        </div>
                    </div>
                    <button class="slider-prev" aria-label="Previous slide">{"‹"}</button>
                    <button class="slider-next" aria-label="Next slide">{"›"}</button>
                    <div class="slider-dots">
                        <button class="slider-dot active" data-slide="0" aria-label="Slide 1"></button>
                        <button class="slider-dot" data-slide="1" aria-label="Slide 2"></button>
                        <button class="slider-dot" data-slide="2" aria-label="Slide 3"></button>
                    </div>
                </div>
                <div class="hero-cta-group">
                    <a href="#pricing" class="hero-cta">{"See plans"}</a>
                </div>
            </section>

            <section id="features" class="features">
                <h2 data-aos="fade-up">{"Why RQG Stream"}</h2>
                <div class="feature-grid">
                    <div class="feature-card" data-aos="fade-up" data-aos-delay="0">
                        <img data-src="/assets/feature-4k.png" alt="4K picture" class="feature-image" />
                        <h3>{"Sharp picture"}</h3>
                        <p>{"Adaptive HD and 4K streams that hold up on busy evenings."}</p>
                    </div>
                    <div class="feature-card" data-aos="fade-up" data-aos-delay="150">
                        <img data-src="/assets/feature-devices.png" alt="Supported devices" class="feature-image" />
                        <h3>{"Any screen"}</h3>
                        <p>{"Works on the TV, box, phone or tablet you already own."}</p>
                    </div>
                    <div class="feature-card" data-aos="fade-up" data-aos-delay="300" data-aos-duration="800">
                        <img data-src="/assets/feature-support.png" alt="Support" class="feature-image" />
                        <h3>{"Real support"}</h3>
                        <p>{"Arabic and English support by chat, seven days a week."}</p>
                    </div>
                </div>
            </section>

            <section id="pricing" class="pricing">
                <h2 data-aos="fade-up">{"Plans"}</h2>
                <div class="countdown" aria-live="polite">
                    <span class="countdown-label">{"Launch prices end in"}</span>
                    <span class="countdown-unit"><b data-unit="days">{"--"}</b>{"d"}</span>
                    <span class="countdown-unit"><b data-unit="hours">{"--"}</b>{"h"}</span>
                    <span class="countdown-unit"><b data-unit="minutes">{"--"}</b>{"m"}</span>
                    <span class="countdown-unit"><b data-unit="seconds">{"--"}</b>{"s"}</span>
                </div>
                <div class="pricing-grid">
                    { for PLANS.iter().map(|plan| html! {
                        <div class={classes!("pricing-card", plan.featured.then(|| "featured"))} tabindex="0">
                            <h3>{plan.name}</h3>
                            <p class="price">{plan.price}<span class="period">{" "}{plan.period}</span></p>
                            <ul class="perks">
                                { for plan.perks.iter().map(|perk| html! { <li>{*perk}</li> }) }
                            </ul>
                            <a
                                href={format!("{}/checkout?plan={}", STORE_URL, plan.slug)}
                                class="plan-cta"
                                target="_blank"
                                data-out="1"
                            >
                                {"Subscribe"}
                            </a>
                        </div>
                    }) }
                </div>
            </section>

            <section id="faq" class="faq">
                <h2 data-aos="fade-up">{"Questions"}</h2>
                <div class="accordion">
                    { for FAQ.iter().enumerate().map(|(i, (question, answer))| html! {
                        <div class="accordion-item">
                            <div
                                class="accordion-header"
                                role="button"
                                tabindex="0"
                                aria-expanded="false"
                                aria-controls={format!("faq-panel-{}", i)}
                            >
                                {*question}
                            </div>
                            <div class="accordion-content" id={format!("faq-panel-{}", i)}>
                                <p>{*answer}</p>
                            </div>
                        </div>
                    }) }
                </div>
            </section>

            <section id="contact" class="contact">
                <h2 data-aos="fade-up">{"Talk to us"}</h2>
                <p>{"Questions before you buy? Our team answers on the store's live chat."}</p>
                <a href={format!("{}/contact", STORE_URL)} class="contact-cta" target="_blank" data-out="1">
                    {"Open live chat"}
                </a>
            </section>

            <footer class="site-footer">
                <Link<Route> to={Route::Privacy} classes="footer-link">{"Privacy"}</Link<Route>>
                <span>{"© RQG Stream"}</span>
            </footer>

            <button id="back-to-top" class="back-to-top" aria-label="Back to top">{"↑"}</button>

            <div class="cookie-banner" role="dialog" aria-label="Cookies">
                <p>{"We use cookies to measure which campaigns bring visitors here."}</p>
                <button class="cookie-accept">{"OK"}</button>
            </div>
        </div>
    }
}

const LANDING_CSS: &str = r#"
    .site-header {
        position: fixed;
        top: 0;
        left: 0;
        right: 0;
        z-index: 100;
        transition: transform 0.3s ease, background 0.3s ease;
    }
    .site-header.scrolled {
        background: rgba(10, 10, 20, 0.92);
        backdrop-filter: blur(8px);
    }
    .site-header.header-hidden {
        transform: translateY(-100%);
    }
    .nav-link.active {
        color: #1e90ff;
    }
    @media (max-width: 768px) {
        .nav-menu {
            display: none;
        }
        body.nav-open .nav-menu {
            display: flex;
            flex-direction: column;
        }
    }
    .hero-slide {
        opacity: 0;
        transition: opacity 0.8s ease;
        position: absolute;
        inset: 0;
    }
    .hero-slide.active {
        opacity: 1;
        position: relative;
    }
    .slider-dot.active {
        background: #fff;
    }
    [data-aos] {
        opacity: 0;
        transform: translateY(24px);
        transition-property: opacity, transform;
        transition-duration: 600ms;
    }
    [data-aos].aos-animate {
        opacity: 1;
        transform: none;
    }
    .countdown.pulse {
        animation: pulse 1.2s ease-in-out infinite;
    }
    @keyframes pulse {
        0%, 100% { transform: scale(1); }
        50% { transform: scale(1.05); }
    }
    .pricing-card {
        transition: transform 0.2s ease, opacity 0.2s ease;
    }
    .pricing-card.is-hovered {
        transform: translateY(-6px);
    }
    .pricing-card.is-dimmed {
        opacity: 0.7;
    }
    .accordion-content {
        max-height: 0;
        overflow: hidden;
        transition: max-height 0.3s ease;
    }
    .back-to-top {
        position: fixed;
        right: 20px;
        bottom: 20px;
        opacity: 0;
        pointer-events: none;
        transition: opacity 0.3s ease;
    }
    .back-to-top.visible {
        opacity: 1;
        pointer-events: auto;
    }
    .site-footer {
        padding-bottom: var(--back-to-top-height, 80px);
    }
    .cookie-banner {
        position: fixed;
        left: 0;
        right: 0;
        bottom: 0;
    }
    .cookie-banner.is-hidden {
        display: none;
    }
"#;
