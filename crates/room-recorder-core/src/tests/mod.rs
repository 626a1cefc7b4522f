mod capture;
mod notify;
mod support;
