//! Portal route table.
//!
//! Paths mirror the web portal's router so bookmarks and the go-to prompt
//! accept the same strings. `/` and unknown paths resolve to the login view.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    StudentDashboard,
    StudentProfile,
    AcademicRecords,
    TransferCertificate,
    DocumentUpload,
    SchemeHistory,
    AdminDashboard,
    AdminStudents,
    AdminTransferCertificates,
    AdminSchools,
}

const STUDENT_NAV: [Route; 6] = [
    Route::StudentDashboard,
    Route::StudentProfile,
    Route::AcademicRecords,
    Route::TransferCertificate,
    Route::DocumentUpload,
    Route::SchemeHistory,
];

const ADMIN_NAV: [Route; 4] = [
    Route::AdminDashboard,
    Route::AdminStudents,
    Route::AdminTransferCertificates,
    Route::AdminSchools,
];

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Login,
        Route::StudentDashboard,
        Route::StudentProfile,
        Route::AcademicRecords,
        Route::TransferCertificate,
        Route::DocumentUpload,
        Route::SchemeHistory,
        Route::AdminDashboard,
        Route::AdminStudents,
        Route::AdminTransferCertificates,
        Route::AdminSchools,
    ];

    /// Exact route for `path`, if one exists
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Resolve any path to a route; `/` and unknown paths go to login.
    pub fn from_path(path: &str) -> Route {
        Route::parse(path).unwrap_or(Route::Login)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::StudentDashboard => "/student/dashboard",
            Route::StudentProfile => "/student/profile",
            Route::AcademicRecords => "/student/academic-records",
            Route::TransferCertificate => "/student/transfer-certificate",
            Route::DocumentUpload => "/student/document-upload",
            Route::SchemeHistory => "/student/scheme-history",
            Route::AdminDashboard => "/admin/dashboard",
            Route::AdminStudents => "/admin/students",
            Route::AdminTransferCertificates => "/admin/transfer-certificates",
            Route::AdminSchools => "/admin/schools",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::StudentDashboard | Route::AdminDashboard => "Dashboard",
            Route::StudentProfile => "My Profile",
            Route::AcademicRecords => "Academic Records",
            Route::TransferCertificate => "Transfer Certificate",
            Route::DocumentUpload => "Document Upload",
            Route::SchemeHistory => "Scheme History",
            Route::AdminStudents => "Students",
            Route::AdminTransferCertificates => "TC Requests",
            Route::AdminSchools => "Schools",
        }
    }

    /// `None` for public routes
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login => None,
            Route::StudentDashboard
            | Route::StudentProfile
            | Route::AcademicRecords
            | Route::TransferCertificate
            | Route::DocumentUpload
            | Route::SchemeHistory => Some(Role::Student),
            Route::AdminDashboard
            | Route::AdminStudents
            | Route::AdminTransferCertificates
            | Route::AdminSchools => Some(Role::Admin),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl Role {
    pub fn home_route(&self) -> Route {
        match self {
            Role::Student => Route::StudentDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }

    /// Navigation menu of the role's layout
    pub fn nav_menu(&self) -> &'static [Route] {
        match self {
            Role::Student => &STUDENT_NAV,
            Role::Admin => &ADMIN_NAV,
        }
    }
}
