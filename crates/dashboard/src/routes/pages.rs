//! Public pages.
//!
//! Reachable without signing in. Entering any of them clears the logout
//! flags (see `middleware::page_guard`).

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalSeller;

/// Static content of a public page.
struct PageContent {
    title: &'static str,
    heading: &'static str,
    paragraphs: &'static [&'static str],
}

const HOME: PageContent = PageContent {
    title: "Sellah",
    heading: "Run your shop from one dashboard",
    paragraphs: &[
        "Track orders from payment to pickup, keep your catalogue current and talk to buyers.",
        "Sign in to open the seller dashboard.",
    ],
};

const ABOUT: PageContent = PageContent {
    title: "About Sellah",
    heading: "About Sellah",
    paragraphs: &[
        "Sellah is a business dashboard for independent sellers.",
        "Orders move through five tabs: unpaid, to ship, shipping, completed and cancelled.",
    ],
};

const REGISTER: PageContent = PageContent {
    title: "Create a seller account",
    heading: "Create a seller account",
    paragraphs: &[
        "Seller accounts are provisioned by the Sellah team.",
        "Contact support with your shop name and we will send you an invitation.",
    ],
};

const FORGOT_PASSWORD: PageContent = PageContent {
    title: "Forgot your password?",
    heading: "Forgot your password?",
    paragraphs: &[
        "Ask your shop administrator for a new password.",
        "They can generate a fresh hash with `sellah-cli hash-password`.",
    ],
};

/// Public page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/public.html")]
pub struct PublicPageTemplate {
    pub title: &'static str,
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
    pub signed_in: bool,
}

impl PublicPageTemplate {
    fn new(content: &PageContent, seller: &OptionalSeller) -> Self {
        Self {
            title: content.title,
            heading: content.heading,
            paragraphs: content.paragraphs,
            signed_in: seller.0.is_some(),
        }
    }
}

/// Home page.
pub async fn home(seller: OptionalSeller) -> impl IntoResponse {
    PublicPageTemplate::new(&HOME, &seller)
}

/// About page.
pub async fn about(seller: OptionalSeller) -> impl IntoResponse {
    PublicPageTemplate::new(&ABOUT, &seller)
}

/// Registration info page.
pub async fn register(seller: OptionalSeller) -> impl IntoResponse {
    PublicPageTemplate::new(&REGISTER, &seller)
}

/// Password help page.
pub async fn forgot_password(seller: OptionalSeller) -> impl IntoResponse {
    PublicPageTemplate::new(&FORGOT_PASSWORD, &seller)
}
