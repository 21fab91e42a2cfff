//! Builders for submissions and raw multipart bodies.

#![allow(dead_code)]

use schooldir::SchoolForm;

const BOUNDARY: &str = "schooldir-test-boundary-7f3a";

/// A form that passes every validation rule.
pub fn valid_form(name: &str, city: &str, state: &str) -> SchoolForm {
    SchoolForm {
        name: name.to_string(),
        email: "office@school.edu.in".to_string(),
        phone: "+91 98765 43210".to_string(),
        address: "12 Station Road, Near Clock Tower".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        pincode: "411001".to_string(),
    }
}

/// Hand-built `multipart/form-data` request body.
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Body carrying every text field of `form`.
    pub fn from_form(form: &SchoolForm) -> Self {
        form.parts()
            .into_iter()
            .fold(Self::new(), |body, (name, value)| body.text(name, value))
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}
